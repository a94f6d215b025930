//! Local filesystem blob store.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use quill_core::domain::UploadedFile;
use quill_core::ports::{BlobError, BlobStore};

use super::{check_key, generate_key};

/// Blob store writing files below a root directory.
///
/// A key `images/<name>` maps to `<root>/images/<name>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        check_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, prefix: &str, file: &UploadedFile) -> Result<String, BlobError> {
        let key = generate_key(prefix, file);
        let path = self.path_for(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| BlobError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(key = %key, bytes = file.bytes.len(), "Blob written to disk");
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(key)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::Io(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        let path = self.path_for(key)?;

        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))
    }
}
