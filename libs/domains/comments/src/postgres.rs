use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

use crate::{
    entity,
    error::CommentResult,
    models::{Comment, NewComment},
    repository::CommentRepository,
};

/// Comment repository over the `comments` table.
///
/// Each operation is a single statement; the store assigns `id` and
/// `created_at`.
#[derive(Clone)]
pub struct PgCommentRepository {
    db: DatabaseConnection,
}

impl PgCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment> {
        let active_model: entity::ActiveModel = comment.into();

        // INSERT ... RETURNING on Postgres
        let model = active_model.insert(&self.db).await?;

        tracing::info!(comment_id = model.id, "Created comment");
        Ok(model.into())
    }

    async fn list(&self) -> CommentResult<Vec<Comment>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Comment::from).collect())
    }

    async fn count(&self) -> CommentResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }
}
