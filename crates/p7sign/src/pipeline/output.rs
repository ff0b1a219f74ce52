//! Output file that is removed unless explicitly committed.

use crate::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A freshly created output file.
///
/// Dropping a `PendingOutput` without calling [`commit`](Self::commit) closes
/// the handle and deletes the file, so a failed pipeline never leaves a
/// partial or unverified artifact behind.
pub(crate) struct PendingOutput {
    file: Option<File>,
    path: PathBuf,
}

impl PendingOutput {
    /// Create (or truncate) the file at `path`, the result of processing
    /// `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `path` names the same file as `source`;
    /// a discarded output would otherwise take the source with it.
    pub(crate) fn create(path: &Path, source: &Path) -> Result<Self> {
        if same_file(path, source) {
            return Err(Error::Config(format!(
                "Output {} is the same file as input {}",
                path.display(),
                source.display()
            )));
        }

        let file = File::create(path).map_err(|source| Error::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Write all of `data` and flush it to disk.
    pub(crate) fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let path = &self.path;
        let wrap = |source| Error::OutputWrite {
            path: path.clone(),
            source,
        };

        match self.file.as_mut() {
            Some(file) => {
                file.write_all(data).map_err(wrap)?;
                file.sync_all().map_err(wrap)
            }
            None => Err(Error::OutputWrite {
                path: self.path.clone(),
                source: std::io::Error::other("output already closed"),
            }),
        }
    }

    /// Keep the file and close its handle.
    pub(crate) fn commit(mut self) {
        self.file.take();
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("Failed to remove discarded output {}: {}", self.path.display(), e);
            } else {
                log::debug!("Discarded output {}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("in.bin");
        fs::write(&path, b"source").unwrap();
        path
    }

    #[test]
    fn test_commit_keeps_file() {
        let dir = TempDir::new().unwrap();
        let source = source(&dir);
        let path = dir.path().join("out.bin");

        let mut out = PendingOutput::create(&path, &source).unwrap();
        out.write_all(b"payload").unwrap();
        out.commit();

        assert_eq!(fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = TempDir::new().unwrap();
        let source = source(&dir);
        let path = dir.path().join("out.bin");

        {
            let mut out = PendingOutput::create(&path, &source).unwrap();
            out.write_all(b"partial").unwrap();
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let source = source(&dir);
        let path = dir.path().join("missing").join("out.bin");

        let err = PendingOutput::create(&path, &source).err().unwrap();
        assert!(matches!(err, Error::OutputOpen { .. }), "{err}");
    }

    #[test]
    fn test_refuses_to_overwrite_source() {
        let dir = TempDir::new().unwrap();
        let source = source(&dir);
        let aliased = dir.path().join(".").join("in.bin");

        for path in [&source, &aliased] {
            let err = PendingOutput::create(path, &source).err().unwrap();
            assert!(matches!(err, Error::Config(_)), "{err}");
        }
        assert_eq!(fs::read(&source).unwrap(), b"source");
    }
}
