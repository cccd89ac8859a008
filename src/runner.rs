//! Shell process execution.
//!
//! Spawns the interpreter on the temp script, waits for it, and captures
//! stdout/stderr. The child inherits our stdin.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one script run.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code, `None` if the child was killed by a signal.
    pub code: Option<i32>,
    /// Everything the child wrote to stdout, unmodified.
    pub stdout: Vec<u8>,
    /// Everything the child wrote to stderr, unmodified.
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    /// Whether the child exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Wrap an argument in double quotes, escaping embedded double quotes.
///
/// Only `"` is escaped: `$`, backticks and backslashes inside the argument
/// are still interpreted by the shell that parses the command line.
pub fn shell_quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\\\""))
}

/// The `sh -c` command line used in quoted mode:
/// `<shell> "<script>" "<arg1>" "<arg2>" …`
pub fn quoted_command_line(shell: &str, script: &Path, args: &[OsString]) -> String {
    let mut line = format!("{shell} \"{}\"", script.display());
    for arg in args {
        line.push(' ');
        line.push_str(&shell_quote(&arg.to_string_lossy()));
    }
    line
}

/// Build the command that runs `script` with positional `args`.
///
/// By default each argument is its own argv entry and never goes through a
/// shell parser. With `quoted` the whole invocation is rendered as a single
/// `sh -c` command line instead.
pub fn build_command(shell: &str, script: &Path, args: &[OsString], quoted: bool) -> Command {
    let mut cmd = if quoted {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(quoted_command_line(shell, script, args));
        cmd
    } else {
        let mut cmd = Command::new(shell);
        cmd.arg(script).args(args);
        cmd
    };

    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Run the command to completion and capture its output.
pub async fn run(mut cmd: Command) -> std::io::Result<ExecutionResult> {
    let start = Instant::now();
    let output = cmd.output().await?;

    let result = ExecutionResult {
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    };
    debug!(
        code = ?result.code,
        stdout_bytes = result.stdout.len(),
        stderr = %String::from_utf8_lossy(&result.stderr),
        duration_ms = start.elapsed().as_millis() as u64,
        "script finished"
    );
    Ok(result)
}
