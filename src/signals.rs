//! Process-wide interrupt and terminate handlers.
//!
//! Both handlers exit the process directly. They neither stop a running
//! child (it may outlive us) nor remove the temp script of the in-flight
//! invocation.

/// Message printed on SIGINT, after a newline.
pub const INTERRUPTED: &str = "Interrupted. Exiting...";

/// Register the listeners. Must be called from within the tokio runtime,
/// once, before the invocation starts.
pub fn install() -> std::io::Result<()> {
    tokio::spawn(async {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::debug!("received interrupt");
            println!("\n{INTERRUPTED}");
            std::process::exit(0);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            if terminate.recv().await.is_some() {
                tracing::debug!("received terminate");
                std::process::exit(0);
            }
        });
    }

    Ok(())
}
