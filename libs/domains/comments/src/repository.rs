use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CommentResult;
use crate::models::{Comment, NewComment};

/// Repository trait for Comment persistence
///
/// Implementations own id and timestamp assignment: ids must be strictly
/// increasing in insertion order, also under concurrent inserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and return it as stored
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment>;

    /// All comments, ascending by id
    async fn list(&self) -> CommentResult<Vec<Comment>>;

    async fn count(&self) -> CommentResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    comments: Vec<Comment>,
    last_id: i64,
}

/// In-memory implementation of CommentRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCommentRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment> {
        let mut store = self.store.write().await;

        // Assigned under the write lock, so pushes stay in id order
        store.last_id += 1;
        let comment = Comment {
            id: store.last_id,
            author: comment.author,
            email: comment.email,
            body: comment.body,
            created_at: Utc::now(),
        };
        store.comments.push(comment.clone());

        tracing::info!(comment_id = comment.id, "Created comment");
        Ok(comment)
    }

    async fn list(&self) -> CommentResult<Vec<Comment>> {
        let store = self.store.read().await;
        Ok(store.comments.clone())
    }

    async fn count(&self) -> CommentResult<u64> {
        let store = self.store.read().await;
        Ok(store.comments.len() as u64)
    }
}
