//! Error taxonomy for a launcher run.
//!
//! Every failure is handled at the top of the run and turned into an exit
//! code plus a message on stderr. Cleanup failures are not errors: the
//! launcher downgrades them to a warning line.

/// Fatal errors of a single invocation.
#[derive(Debug)]
pub enum LaunchError {
    /// No arguments at all.
    Usage,
    /// Source argument is empty or not valid UTF-8.
    Argument(String),
    /// URL source could not be fetched (network failure, non-200, bad URL).
    Download(String),
    /// Script body could not be written to the temp file.
    Write(String),
    /// Shell process could not be spawned or awaited.
    Spawn(std::io::Error),
    /// Script ran and exited non-zero (or was killed by a signal).
    Execution {
        /// Child exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Captured stderr of the child, as raw bytes.
        stderr: Vec<u8>,
    },
}

impl LaunchError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Execution { code, .. } => match code {
                Some(0) | None => 1,
                Some(c) => *c,
            },
            _ => 1,
        }
    }
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage => write!(f, "{}", crate::invocation::USAGE),
            Self::Argument(msg) => write!(f, "Error: {msg}"),
            Self::Download(detail) => write!(f, "Error: Failed to download script: {detail}"),
            Self::Write(msg) => write!(f, "Error: {msg}"),
            Self::Spawn(e) => write!(f, "Error: failed to start shell: {e}"),
            // The child's own stderr is the whole message.
            Self::Execution { stderr, .. } => write!(f, "{}", String::from_utf8_lossy(stderr)),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
