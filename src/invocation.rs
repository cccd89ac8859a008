//! Command-line parsing.
//!
//! Arguments are taken verbatim: the first is the script source, the rest
//! become `$1`, `$2`, … No option syntax is recognised, so `-h` or `--` are
//! script text or positional parameters like anything else.

use std::ffi::OsString;

use crate::error::LaunchError;

pub const USAGE: &str = "Usage: shell-executor \"shell script\" [args...]\n\
Example: shell-executor \"echo Hello $1 $2\" world user";

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Literal script text or an http(s) URL.
    pub source: String,
    /// Positional parameters for the script.
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Parse the program arguments, excluding argv[0].
    pub fn parse<I>(args: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut args = args.into_iter();
        let source = args.next().ok_or(LaunchError::Usage)?;

        let source = source.into_string().map_err(|_| {
            LaunchError::Argument("First argument must be a shell script string".into())
        })?;
        if source.is_empty() {
            return Err(LaunchError::Argument(
                "First argument must be a shell script string".into(),
            ));
        }

        Ok(Self {
            source,
            args: args.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_no_arguments_is_usage_error() {
        let result = Invocation::parse(Vec::new());
        assert!(matches!(result, Err(LaunchError::Usage)));
    }

    #[test]
    fn test_empty_source_is_argument_error() {
        let result = Invocation::parse(os(&["", "x"]));
        assert!(matches!(result, Err(LaunchError::Argument(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_source_is_argument_error() {
        use std::os::unix::ffi::OsStringExt;
        let bad = OsString::from_vec(vec![0x66, 0x6f, 0xff]);
        let result = Invocation::parse(vec![bad]);
        assert!(matches!(result, Err(LaunchError::Argument(_))));
    }

    #[test]
    fn test_source_and_positional_args() {
        let inv = Invocation::parse(os(&["echo hi $1", "world", "--", "-h"])).unwrap();
        assert_eq!(inv.source, "echo hi $1");
        assert_eq!(inv.args, os(&["world", "--", "-h"]));
    }

    #[test]
    fn test_usage_mentions_example() {
        assert!(USAGE.starts_with("Usage: shell-executor"));
        assert!(USAGE.contains("\nExample: "));
    }
}
