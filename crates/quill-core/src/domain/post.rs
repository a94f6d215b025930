use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a blog post with an optional image attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Blob store key of the last uploaded image, if any.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A post that has not been persisted yet; the store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// An uploaded file payload as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side filename, used only to pick an extension.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// What the client sent for the `image` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageField {
    #[default]
    Absent,
    File(UploadedFile),
    /// A value was supplied that is not a file payload (e.g. plain text).
    Malformed,
}

/// What the client sent for a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextField {
    #[default]
    Absent,
    Text(String),
    /// A value was supplied that is not a string (e.g. a JSON number).
    Malformed,
}

impl From<&str> for TextField {
    fn from(value: &str) -> Self {
        TextField::Text(value.to_string())
    }
}

impl From<String> for TextField {
    fn from(value: String) -> Self {
        TextField::Text(value)
    }
}

/// Raw, unvalidated input for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    pub title: TextField,
    pub description: TextField,
    pub image: ImageField,
}

impl PostInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: TextField::Text(title.into()),
            description: TextField::Text(description.into()),
            image: ImageField::Absent,
        }
    }

    pub fn with_image(mut self, file: UploadedFile) -> Self {
        self.image = ImageField::File(file);
        self
    }
}
