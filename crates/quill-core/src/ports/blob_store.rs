//! Blob store port - where uploaded files live.

use async_trait::async_trait;

use crate::domain::UploadedFile;

/// Prefix under which post images are stored.
pub const IMAGE_PREFIX: &str = "images";

/// Blob store trait - abstraction over file storage backends (local disk, in-memory).
///
/// Keys have the form `<prefix>/<generated-name>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the file under `prefix` with a generated, collision-resistant name.
    /// Returns the storage key.
    async fn put(&self, prefix: &str, file: &UploadedFile) -> Result<String, BlobError>;

    /// Read the bytes stored at `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Check whether `key` exists.
    async fn exists(&self, key: &str) -> Result<bool, BlobError>;
}

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}
