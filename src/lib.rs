//! Run a shell script given inline or by URL.
//!
//! The script body is written to a temp file, executed with `bash` and the
//! remaining arguments as `$1`, `$2`, …, and the temp file is removed when the
//! child exits. [`launcher::run`] drives one invocation end to end.

pub mod config;
pub mod error;
pub mod fetch;
pub mod invocation;
pub mod launcher;
pub mod runner;
pub mod script;
pub mod signals;

pub use config::ExecutorConfig;
pub use error::LaunchError;
