//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod repository;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use blob_store::{BlobError, BlobStore, IMAGE_PREFIX};
pub use repository::{BaseRepository, PostRepository};
