//! Blob store implementations - local disk and in-memory.

mod local;
mod memory;

use std::path::{Component, Path};

use quill_core::domain::UploadedFile;
use quill_core::ports::BlobError;

pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;

/// Build a fresh key `<prefix>/<uuid>.<ext>` for `file`.
pub(crate) fn generate_key(prefix: &str, file: &UploadedFile) -> String {
    let name = format!("{}.{}", uuid::Uuid::new_v4().simple(), extension(file));

    match prefix.trim_matches('/') {
        "" => name,
        prefix => format!("{prefix}/{name}"),
    }
}

/// Reject keys that could escape the storage root.
pub(crate) fn check_key(key: &str) -> Result<(), BlobError> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && !key.contains('\\')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if safe {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

fn extension(file: &UploadedFile) -> String {
    Path::new(&file.filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            file.content_type
                .as_deref()
                .and_then(extension_for_mime)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "bin".to_string())
}

fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next()?.trim();
    match essence {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "text/plain" => Some("txt"),
        _ => None,
    }
}
