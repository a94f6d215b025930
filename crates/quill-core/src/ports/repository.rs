use async_trait::async_trait;

use crate::domain::{NewPost, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an existing entity, overwriting the stored row.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] if absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository - the persistence store for posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a new post. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// All posts ordered by ascending id.
    async fn all(&self) -> Result<Vec<Post>, RepoError>;

    /// Number of stored posts.
    async fn count(&self) -> Result<u64, RepoError>;
}
