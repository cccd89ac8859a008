//! Executor configuration.
//!
//! Every setting can be overridden via SHELL_EXECUTOR_* environment variables.
//! With nothing set, the defaults give the stock behaviour: `bash`, arguments
//! passed as argv, no download timeout, plain HTTP allowed.

use std::path::PathBuf;

use crate::fetch::HttpConfig;

/// Configuration for one launcher run.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Interpreter used to run the temp script (default: `bash`).
    pub shell: String,
    /// Pass arguments through a `sh -c` command line with double-quote
    /// wrapping instead of as separate argv entries.
    pub quoted_args: bool,
    /// Directory the temp script is written to (default: OS temp dir).
    pub temp_dir: PathBuf,
    /// Download settings for URL sources.
    pub http: HttpConfig,
}

impl ExecutorConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_ms = env_u64("SHELL_EXECUTOR_HTTP_TIMEOUT_MS", 0);

        Self {
            shell: std::env::var("SHELL_EXECUTOR_SHELL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.shell),
            quoted_args: env_bool("SHELL_EXECUTOR_QUOTED_ARGS", false),
            temp_dir: std::env::var_os("SHELL_EXECUTOR_TMPDIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            http: HttpConfig {
                timeout_ms: (timeout_ms > 0).then_some(timeout_ms),
                max_response_bytes: env_u64(
                    "SHELL_EXECUTOR_HTTP_MAX_BYTES",
                    defaults.http.max_response_bytes,
                ),
                allow_http: !env_bool("SHELL_EXECUTOR_HTTPS_ONLY", false),
            },
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            quoted_args: false,
            temp_dir: std::env::temp_dir(),
            http: HttpConfig::default(),
        }
    }
}

/// Read a u64 from an env var, falling back to a default.
fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag from an env var. Accepts 1/true/yes, case-insensitive.
fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => parse_flag(&v),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ExecutorConfig::default();
        assert_eq!(config.shell, "bash");
        assert!(!config.quoted_args);
        assert_eq!(config.temp_dir, std::env::temp_dir());
        assert_eq!(config.http.timeout_ms, None);
        assert_eq!(config.http.max_response_bytes, 10 * 1024 * 1024);
        assert!(config.http.allow_http);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_env_u64_falls_back_on_garbage() {
        // Key chosen so no other test touches it.
        std::env::set_var("SHELL_EXECUTOR_TEST_U64_GARBAGE", "not-a-number");
        assert_eq!(env_u64("SHELL_EXECUTOR_TEST_U64_GARBAGE", 7), 7);
        std::env::set_var("SHELL_EXECUTOR_TEST_U64_GARBAGE", "42");
        assert_eq!(env_u64("SHELL_EXECUTOR_TEST_U64_GARBAGE", 7), 42);
        std::env::remove_var("SHELL_EXECUTOR_TEST_U64_GARBAGE");
    }
}
