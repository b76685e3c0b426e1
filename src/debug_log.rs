//! Debug file log
//!
//! Appends plain lines to a local file when debug mode is on. Each write
//! opens, appends and closes the file before returning.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DebugLog {
    path: Option<PathBuf>,
}

impl DebugLog {
    /// Log to `path`, or nowhere when `enabled` is false
    pub fn new(enabled: bool, path: impl Into<PathBuf>) -> Self {
        Self {
            path: enabled.then(|| path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one line. Returns Ok without touching the disk when disabled.
    pub fn append(&self, message: &str) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Best-effort append: failures are reported through tracing and dropped
    pub fn log(&self, message: &str) {
        if let Err(e) = self.append(message) {
            tracing::warn!("Failed to write debug log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_append_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Log.txt");
        let log = DebugLog::new(true, &path);

        log.append("first").unwrap();
        log.append("second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Log.txt");
        fs::write(&path, "earlier run\n").unwrap();

        DebugLog::new(true, &path).append("this run").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier run\nthis run\n");
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Log.txt");
        let log = DebugLog::new(false, &path);

        log.append("ignored").unwrap();
        log.log("ignored");

        assert!(log.path().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_is_best_effort() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("Log.txt");
        // A directory cannot be opened for appending
        fs::create_dir(&target).unwrap();
        let log = DebugLog::new(true, &target);

        assert!(log.append("x").is_err());
        log.log("x");
    }
}
