//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder};

use quill_core::domain::{NewPost, Post};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(new_post)
            .insert(&self.db)
            .await
            .map_err(repo_error)?;

        tracing::debug!(post_id = model.id, "Inserted post row");
        Ok(model.into())
    }

    async fn all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(repo_error)
    }
}
