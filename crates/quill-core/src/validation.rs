//! Input validation for post create and update.
//!
//! Each operation has a [`PostRules`] value naming the constraint on every
//! field. Rules are evaluated eagerly: every failing field is reported, not
//! just the first one.

use std::fmt;

use crate::domain::{ImageField, PostInput, TextField, UploadedFile};

/// Whether a text field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// May be omitted, but must not be blank when supplied.
    Optional,
}

/// Constraints applied to a [`PostInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRules {
    pub title: Presence,
    pub description: Presence,
}

impl PostRules {
    pub const CREATE: PostRules = PostRules {
        title: Presence::Required,
        description: Presence::Required,
    };

    pub const UPDATE: PostRules = PostRules {
        title: Presence::Optional,
        description: Presence::Optional,
    };

    /// Validate `input`, returning the cleaned values or every field error.
    pub fn validate(&self, input: PostInput) -> Result<ValidPost, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = check_text("title", input.title, self.title, &mut errors);
        let description = check_text(
            "description",
            input.description,
            self.description,
            &mut errors,
        );

        let image = match input.image {
            ImageField::Absent => None,
            ImageField::File(file) => Some(file),
            ImageField::Malformed => {
                errors.push("image", "The image field must be a file.");
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidPost {
            title,
            description,
            image,
        })
    }
}

fn check_text(
    field: &'static str,
    value: TextField,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let trimmed = match value {
        TextField::Absent => None,
        TextField::Text(v) => Some(v.trim().to_string()),
        TextField::Malformed => {
            errors.push(field, format!("The {field} field must be a string."));
            return None;
        }
    };

    match (trimmed, presence) {
        (Some(v), _) if !v.is_empty() => Some(v),
        (None, Presence::Optional) => None,
        _ => {
            errors.push(field, format!("The {field} field is required."));
            None
        }
    }
}

/// Input that passed [`PostRules::validate`].
///
/// For create rules `title` and `description` are always `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<UploadedFile>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level failure found in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages recorded for `field`, in order.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}
