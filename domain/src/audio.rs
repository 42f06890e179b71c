//! Local filesystem storage for uploaded meeting audio.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use log::*;
use std::path::PathBuf;
use tokio::fs;

/// Filesystem store for raw meeting recordings.
pub struct AudioStore {
    base_dir: PathBuf,
}

impl AudioStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Persist `bytes` under `filename`, creating the directory if needed.
    /// Returns the absolute path of the stored file.
    pub async fn store(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.base_dir).await.map_err(io_error)?;

        let path = self.base_dir.join(filename);
        fs::write(&path, bytes).await.map_err(io_error)?;

        debug!("Stored audio file: {}", path.display());
        Ok(path)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, filename: &str) {
        let path = self.base_dir.join(filename);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove audio file {}: {:?}", path.display(), e);
            }
        }
    }
}

fn io_error(e: std::io::Error) -> Error {
    Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Audio storage I/O failure".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_bytes_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path());

        let path = store.store(b"RIFFdata", "m1.wav").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"RIFFdata");
    }

    #[tokio::test]
    async fn test_store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path().join("nested/audio"));

        let path = store.store(b"bytes", "m2.wav").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_remove_is_silent_for_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path());

        // Nothing stored under this name; must not panic or error.
        store.remove("missing.wav").await;
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path());

        let path = store.store(b"bytes", "m3.wav").await.unwrap();
        store.remove("m3.wav").await;
        assert!(!path.exists());
    }
}
