//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, file storage, and token integrations.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL persistence via SeaORM
//!
//! Without `postgres`, only the in-memory repository is available.

pub mod auth;
pub mod database;
pub mod storage;

// Re-exports - In-Memory
pub use database::InMemoryPostRepository;
pub use storage::{InMemoryBlobStore, LocalBlobStore};

pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
