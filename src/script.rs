//! Temporary script file.
//!
//! Each invocation writes its script body to
//! `<tmp>/shell-executor-<millis>-<9 base36 chars>.sh`, mode 0755. The file is
//! opened with create-new, so a name collision fails the write instead of
//! clobbering another invocation's script.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::debug;

const PREFIX: &str = "shell-executor";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build a fresh file name for a temp script.
pub fn unique_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{PREFIX}-{millis}-{suffix}.sh")
}

/// A script body materialized on disk.
///
/// Call [`TempScript::remove`] once the child has exited; its error is the
/// caller's to report. If the value is dropped without that (early return
/// after a failed write), the file is removed silently.
#[derive(Debug)]
pub struct TempScript {
    path: PathBuf,
    removed: bool,
}

impl TempScript {
    /// Write `body` to a new file under `dir`.
    ///
    /// On failure the partially written file, if any, is deleted before the
    /// error is returned.
    pub fn create(dir: &Path, body: &[u8]) -> Result<Self> {
        let path = dir.join(unique_name());
        let mut file = open_executable(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        // From here on the guard owns the file, so any `?` cleans up.
        let script = Self {
            path,
            removed: false,
        };

        file.write_all(body)
            .and_then(|()| file.sync_all())
            .with_context(|| format!("failed to write {}", script.path.display()))?;
        set_executable(&script.path)
            .with_context(|| format!("failed to set permissions on {}", script.path.display()))?;

        debug!(path = %script.path.display(), bytes = body.len(), "wrote temp script");
        Ok(script)
    }

    /// Location of the script on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Called once, after the child has exited.
    pub fn remove(mut self) -> std::io::Result<()> {
        self.removed = true;
        fs::remove_file(&self.path)?;
        debug!(path = %self.path.display(), "removed temp script");
        Ok(())
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        if !self.removed && self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(unix)]
fn open_executable(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o755)
        .open(path)
}

#[cfg(not(unix))]
fn open_executable(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}

/// Force 0755 regardless of the process umask.
#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_shape() {
        let name = unique_name();
        let stem = name
            .strip_prefix("shell-executor-")
            .and_then(|s| s.strip_suffix(".sh"))
            .unwrap();
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<u128>().is_ok());
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_unique_names_differ() {
        let names: std::collections::HashSet<_> = (0..200).map(|_| unique_name()).collect();
        assert_eq!(names.len(), 200);
    }

    #[test]
    fn test_create_writes_body() {
        let dir = tempfile::tempdir().unwrap();
        let script = TempScript::create(dir.path(), b"echo hi\n").unwrap();
        assert!(script.path().starts_with(dir.path()));
        assert_eq!(fs::read_to_string(script.path()).unwrap(), "echo hi\n");
    }

    #[test]
    fn test_create_keeps_non_utf8_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let body = b"# caf\xe9\necho ok\n";
        let script = TempScript::create(dir.path(), body).unwrap();
        assert_eq!(fs::read(script.path()).unwrap(), body);
    }

    #[cfg(unix)]
    #[test]
    fn test_create_sets_mode_0755() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let script = TempScript::create(dir.path(), b"true").unwrap();
        let mode = fs::metadata(script.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = TempScript::create(dir.path(), b"true").unwrap();
        let path = script.path().to_path_buf();
        script.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = TempScript::create(dir.path(), b"true").unwrap();
        fs::remove_file(script.path()).unwrap();
        assert!(script.remove().is_err());
    }

    #[test]
    fn test_drop_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let script = TempScript::create(dir.path(), b"true").unwrap();
            script.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = TempScript::create(&missing, b"true").unwrap_err();
        assert!(format!("{err:#}").contains("failed to create"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
