//! In-memory blob store - for tests and disk-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::UploadedFile;
use quill_core::ports::{BlobError, BlobStore};

use super::{check_key, generate_key};

/// Blob store keeping every file in a HashMap.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, prefix: &str, file: &UploadedFile) -> Result<String, BlobError> {
        let key = generate_key(prefix, file);

        let mut blobs = self.blobs.write().await;
        blobs.insert(key.clone(), file.bytes.clone());

        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        check_key(key)?;
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        check_key(key)?;
        Ok(self.blobs.read().await.contains_key(key))
    }
}
