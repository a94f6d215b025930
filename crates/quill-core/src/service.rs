//! Post use cases: create, list, get, update, delete.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostInput, UploadedFile};
use crate::error::{DomainError, RepoError};
use crate::ports::{BlobStore, IMAGE_PREFIX, PostRepository};
use crate::validation::PostRules;

const ENTITY: &str = "post";

/// Post resource service over a persistence store and a blob store.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { posts, blobs }
    }

    /// Validate, store the optional image, then insert the record.
    pub async fn create(&self, input: PostInput) -> Result<Post, DomainError> {
        let valid = PostRules::CREATE.validate(input)?;
        let image_url = self.store_image(valid.image.as_ref()).await?;

        // Both fields are present under CREATE rules.
        let new_post = NewPost {
            title: valid.title.unwrap_or_default(),
            description: valid.description.unwrap_or_default(),
            image_url: image_url.clone(),
        };

        let post = self
            .posts
            .create(new_post)
            .await
            .inspect_err(|_| Self::warn_orphan(image_url.as_deref()))?;

        tracing::info!(post_id = post.id, image_key = ?post.image_url, "Post created");
        Ok(post)
    }

    /// All posts, oldest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.all().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Post, DomainError> {
        self.find_or_not_found(id).await
    }

    /// Overwrite the supplied fields of an existing post.
    ///
    /// A new image replaces `image_url`; without one the previous key is kept.
    pub async fn update(&self, id: i64, input: PostInput) -> Result<Post, DomainError> {
        let mut post = self.find_or_not_found(id).await?;
        let valid = PostRules::UPDATE.validate(input)?;

        let image_url = self.store_image(valid.image.as_ref()).await?;
        if let Some(key) = &image_url {
            post.image_url = Some(key.clone());
        }
        if let Some(title) = valid.title {
            post.title = title;
        }
        if let Some(description) = valid.description {
            post.description = description;
        }
        post.touch();

        let post = self
            .posts
            .save(post)
            .await
            .map_err(|e| Self::not_found_or(e, id))
            .inspect_err(|_| Self::warn_orphan(image_url.as_deref()))?;

        tracing::info!(post_id = post.id, image_key = ?post.image_url, "Post updated");
        Ok(post)
    }

    /// Remove the record. The stored image, if any, is left in the blob store.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let post = self.find_or_not_found(id).await?;

        self.posts
            .delete(post.id)
            .await
            .map_err(|e| Self::not_found_or(e, id))?;

        tracing::info!(post_id = id, image_key = ?post.image_url, "Post deleted");
        Ok(())
    }

    async fn find_or_not_found(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            })
    }

    async fn store_image(&self, file: Option<&UploadedFile>) -> Result<Option<String>, DomainError> {
        let Some(file) = file else {
            return Ok(None);
        };

        let key = self.blobs.put(IMAGE_PREFIX, file).await?;
        tracing::debug!(image_key = %key, size = file.bytes.len(), "Image stored");
        Ok(Some(key))
    }

    // A concurrent delete can remove the row between lookup and write.
    fn not_found_or(err: RepoError, id: i64) -> DomainError {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: ENTITY,
                id,
            },
            other => other.into(),
        }
    }

    fn warn_orphan(image_key: Option<&str>) {
        if let Some(key) = image_key {
            tracing::warn!(image_key = %key, "Record write failed after image upload; blob left orphaned");
        }
    }
}
