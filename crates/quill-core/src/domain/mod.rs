//! Domain entities - the core business objects.

mod post;

pub use post::{ImageField, NewPost, Post, PostInput, TextField, UploadedFile};
