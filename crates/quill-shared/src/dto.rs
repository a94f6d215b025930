//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A post as returned by every post endpoint.
///
/// Timestamps are rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// JSON body accepted by create and update when no file is uploaded.
///
/// Fields are kept as raw values so that a wrong type becomes a field-level
/// validation error rather than a rejected body. JSON cannot carry a file, so
/// any `image` other than `null` or `""` is rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: Option<serde_json::Value>,
    pub description: Option<serde_json::Value>,
    pub image: Option<serde_json::Value>,
}

/// Acknowledgement returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

impl DeletedResponse {
    pub fn deleted() -> Self {
        Self {
            message: "deleted".to_string(),
        }
    }
}
