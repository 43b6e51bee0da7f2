//! PID file bookkeeping.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::ProcessError;

/// A plain-text PID file holding a single decimal process identifier.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Creates a handle for the PID file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the PID file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `pid`, overwriting any previous content.
    pub fn write(&self, pid: u32) -> Result<(), ProcessError> {
        std::fs::write(&self.path, format!("{pid}\n"))?;
        debug!("Wrote pid {} to {}", pid, self.path.display());
        Ok(())
    }

    /// Reads the recorded PID.
    ///
    /// Returns `Ok(None)` when the file does not exist. Surrounding
    /// whitespace is tolerated; anything else is a malformed-file error.
    pub fn read(&self) -> Result<Option<u32>, ProcessError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        content
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ProcessError::MalformedPidFile {
                path: self.path.display().to_string(),
                content: content.trim().to_owned(),
            })
    }

    /// Removes the PID file. Missing files are not an error.
    pub fn remove(&self) -> Result<(), ProcessError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let pidfile = PidFile::new(dir.path().join("bot.pid"));

        pidfile.write(4242).unwrap();
        assert_eq!(pidfile.read().unwrap(), Some(4242));
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let pidfile = PidFile::new(dir.path().join("absent.pid"));
        assert_eq!(pidfile.read().unwrap(), None);
    }

    #[test]
    fn test_read_tolerates_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot.pid");
        std::fs::write(&path, "  1234\n\n").unwrap();

        let pidfile = PidFile::new(path);
        assert_eq!(pidfile.read().unwrap(), Some(1234));
    }

    #[test]
    fn test_read_rejects_junk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot.pid");
        std::fs::write(&path, "not-a-pid").unwrap();

        let pidfile = PidFile::new(path);
        assert!(matches!(
            pidfile.read(),
            Err(ProcessError::MalformedPidFile { .. })
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let pidfile = PidFile::new(dir.path().join("bot.pid"));

        pidfile.write(1).unwrap();
        pidfile.remove().unwrap();
        pidfile.remove().unwrap();
        assert_eq!(pidfile.read().unwrap(), None);
    }
}
