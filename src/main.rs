//! shell-executor: run an inline or downloaded shell script.
//!
//! Usage: shell-executor <script|url> [arg1] [arg2] ...

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shell_executor::{launcher, signals, ExecutorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics are off unless SHELL_EXECUTOR_LOG asks for them.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("SHELL_EXECUTOR_LOG").unwrap_or_else(|_| EnvFilter::new("off")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    signals::install().context("failed to install signal handlers")?;

    let config = ExecutorConfig::from_env();
    tracing::debug!(?config, "loaded configuration");

    let args = std::env::args_os().skip(1).collect();
    let code = launcher::run(args, &config, &mut std::io::stdout(), &mut std::io::stderr()).await;

    std::process::exit(code);
}
