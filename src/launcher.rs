//! One invocation, start to finish.
//!
//! parse args → resolve source (download?) → write temp script → run shell
//! → remove temp script → relay output. Any step may end the run early with
//! a [`LaunchError`]; the temp script is removed whenever it was created.

use std::ffi::OsString;
use std::io::Write;

use tracing::{info, warn};

use crate::config::ExecutorConfig;
use crate::error::LaunchError;
use crate::fetch;
use crate::invocation::Invocation;
use crate::runner::{self, ExecutionResult};
use crate::script::TempScript;

/// Run one invocation and return the process exit code.
///
/// `out` and `err` receive what the tool itself prints: the child's relayed
/// output, progress lines, errors and warnings.
pub async fn run<O, E>(args: Vec<OsString>, config: &ExecutorConfig, out: &mut O, err: &mut E) -> i32
where
    O: Write,
    E: Write,
{
    let code = match launch(args, config, out, err).await {
        Ok(()) => 0,
        Err(e) => {
            report(&e, err);
            e.exit_code()
        }
    };
    let _ = out.flush();
    let _ = err.flush();
    code
}

async fn launch<O, E>(
    args: Vec<OsString>,
    config: &ExecutorConfig,
    out: &mut O,
    err: &mut E,
) -> Result<(), LaunchError>
where
    O: Write,
    E: Write,
{
    let invocation = Invocation::parse(args)?;
    let body = resolve_source(&invocation.source, config, err).await?;

    let script = TempScript::create(&config.temp_dir, &body)
        .map_err(|e| LaunchError::Write(format!("{e:#}")))?;

    let cmd = runner::build_command(
        &config.shell,
        script.path(),
        &invocation.args,
        config.quoted_args,
    );
    info!(
        shell = %config.shell,
        script = %script.path().display(),
        args = invocation.args.len(),
        quoted = config.quoted_args,
        "running script"
    );
    let outcome = runner::run(cmd).await;

    // Cleanup happens whatever the child did, before any output is relayed.
    let path = script.path().to_path_buf();
    if let Err(e) = script.remove() {
        warn!(path = %path.display(), error = %e, "temp script cleanup failed");
        let _ = writeln!(
            err,
            "Warning: Could not clean up temporary file: {}",
            path.display()
        );
    }

    relay(outcome.map_err(LaunchError::Spawn)?, out, err)
}

/// Turn the source argument into the script body, downloading it if it is a URL.
async fn resolve_source<E: Write>(
    source: &str,
    config: &ExecutorConfig,
    err: &mut E,
) -> Result<Vec<u8>, LaunchError> {
    if !fetch::is_url(source) {
        return Ok(source.as_bytes().to_vec());
    }

    let _ = writeln!(err, "Downloading script from: {source}");
    let _ = err.flush();
    fetch::fetch(source, &config.http)
        .await
        .map_err(|e| LaunchError::Download(e.to_string()))
}

/// Copy the child's output to ours. A non-zero exit becomes an error that
/// carries the child's stderr.
fn relay<O, E>(result: ExecutionResult, out: &mut O, err: &mut E) -> Result<(), LaunchError>
where
    O: Write,
    E: Write,
{
    if !result.success() {
        return Err(LaunchError::Execution {
            code: result.code,
            stderr: result.stderr,
        });
    }

    if !result.stdout.is_empty() {
        let _ = out.write_all(&result.stdout);
    }
    if !result.stderr.is_empty() {
        let _ = err.write_all(&result.stderr);
    }
    Ok(())
}

fn report<E: Write>(error: &LaunchError, err: &mut E) {
    let _ = match error {
        // Raw, exactly as the child wrote it.
        LaunchError::Execution { stderr, .. } => err.write_all(stderr),
        _ => writeln!(err, "{error}"),
    };
}
