//! Single-instance guard backed by a lock file.
//!
//! The file is created exclusively; a second run that finds it already
//! present exits quietly instead of scanning concurrently.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use triage::TriageError;

/// Held lock; removes its file when dropped.
#[derive(Debug)]
pub struct ProcessLock {
    path: Utf8PathBuf,
}

impl ProcessLock {
    /// Creates the lock file at `path`.
    ///
    /// Returns `Ok(None)` when another run already holds the lock.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Io`] when the file cannot be created for any
    /// reason other than already existing.
    pub fn acquire(path: &Utf8Path) -> Result<Option<Self>, TriageError> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_file) => Ok(Some(Self {
                path: path.to_path_buf(),
            })),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(error) => Err(TriageError::Io {
                message: format!("failed to create lock file {path}: {error}"),
            }),
        }
    }

    /// Location of the lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path, "failed to remove lock file: {error}");
        }
    }
}
