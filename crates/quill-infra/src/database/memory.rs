//! In-memory post repository - used when no database is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

struct Store {
    rows: BTreeMap<i64, Post>,
    last_id: i64,
}

/// In-memory post table with a monotonically increasing id sequence.
///
/// Ids are never reused, even after deletes.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.rows.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        match store.rows.get_mut(&post.id) {
            Some(row) => {
                *row = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        store.last_id += 1;
        let now = Utc::now();
        let post = Post {
            id: store.last_id,
            title: new_post.title,
            description: new_post.description,
            image_url: new_post.image_url,
            created_at: now,
            updated_at: now,
        };
        store.rows.insert(post.id, post.clone());

        Ok(post)
    }

    async fn all(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.rows.values().cloned().collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.rows.len() as u64)
    }
}
