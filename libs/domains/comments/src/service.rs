use observability::{CommentMetrics, PostOutcome};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

use crate::error::CommentResult;
use crate::models::{Comment, ListComments, PostComment};
use crate::repository::CommentRepository;

/// Service layer for the comment board
///
/// Holds no state of its own; every call is one round trip to the repository.
pub struct CommentService<R: CommentRepository> {
    repository: Arc<R>,
}

impl<R: CommentRepository> Clone for CommentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CommentRepository> CommentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate, apply defaults and insert. Rejected input never reaches the store.
    ///
    /// There is no idempotency key: a retried call stores a second comment.
    pub async fn post(&self, input: PostComment) -> CommentResult<Comment> {
        if let Err(errors) = input.validate() {
            tracing::debug!(%errors, "Rejected comment");
            CommentMetrics::record_post(PostOutcome::Rejected);
            return Err(errors.into());
        }

        match self.repository.insert(input.into()).await {
            Ok(comment) => {
                CommentMetrics::record_post(PostOutcome::Created);
                tracing::info!(comment_id = comment.id, author = %comment.author, "Posted comment");
                Ok(comment)
            }
            Err(e) => {
                CommentMetrics::record_post(PostOutcome::Failed);
                Err(e)
            }
        }
    }

    /// Every comment, ascending by id.
    pub async fn list(&self, _input: ListComments) -> CommentResult<Vec<Comment>> {
        let start = Instant::now();
        match self.repository.list().await {
            Ok(comments) => {
                CommentMetrics::record_list(comments.len(), start.elapsed());
                Ok(comments)
            }
            Err(e) => {
                CommentMetrics::record_list_failure();
                Err(e)
            }
        }
    }

    /// Number of stored comments; refreshes the `comments_total` gauge.
    pub async fn count(&self) -> CommentResult<u64> {
        let total = self.repository.count().await?;
        CommentMetrics::set_comments_total(total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommentError;
    use crate::models::{ANONYMOUS_AUTHOR, NewComment};
    use crate::repository::MockCommentRepository;
    use chrono::Utc;
    use sea_orm::DbErr;

    fn stored(id: i64, new: NewComment) -> Comment {
        Comment {
            id,
            author: new.author,
            email: new.email,
            body: new.body,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_post_rejects_empty_body_without_insert() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo.expect_insert().never();

        let service = CommentService::new(mock_repo);
        let result = service
            .post(PostComment {
                body: String::new(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(CommentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_post_defaults_empty_author_and_email() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_insert()
            .withf(|new| new.author == ANONYMOUS_AUTHOR && new.email.is_none() && new.body == "x")
            .times(1)
            .returning(|new| Ok(stored(1, new)));

        let service = CommentService::new(mock_repo);
        let comment = service
            .post(PostComment {
                author: Some(String::new()),
                email: Some(String::new()),
                body: "x".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(comment.author, ANONYMOUS_AUTHOR);
        assert_eq!(comment.email, None);
    }

    #[tokio::test]
    async fn test_post_stores_body_verbatim() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_insert()
            .withf(|new| new.body == "  spaced  \n")
            .returning(|new| Ok(stored(3, new)));

        let service = CommentService::new(mock_repo);
        let comment = service
            .post(PostComment {
                body: "  spaced  \n".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(comment.id, 3);
    }

    #[tokio::test]
    async fn test_post_propagates_store_failure() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_insert()
            .returning(|_| Err(DbErr::Custom("connection refused".to_string()).into()));

        let service = CommentService::new(mock_repo);
        let result = service
            .post(PostComment {
                body: "hello".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(CommentError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_returns_repository_order() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo.expect_list().times(1).returning(|| {
            Ok(vec![
                stored(1, NewComment {
                    author: "a".into(),
                    email: None,
                    body: "first".into(),
                }),
                stored(2, NewComment {
                    author: "b".into(),
                    email: None,
                    body: "second".into(),
                }),
            ])
        });

        let service = CommentService::new(mock_repo);
        let comments = service.list(ListComments {}).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "first");
    }

    #[tokio::test]
    async fn test_count_reads_repository() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo.expect_count().times(1).returning(|| Ok(42));

        let service = CommentService::new(mock_repo);

        assert_eq!(service.count().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_count_propagates_store_failure() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_count()
            .returning(|| Err(DbErr::Custom("connection refused".to_string()).into()));

        let service = CommentService::new(mock_repo);

        assert!(matches!(service.count().await, Err(CommentError::Database(_))));
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo.expect_list().returning(|| Ok(vec![]));

        let service = CommentService::new(mock_repo);

        assert!(service.list(ListComments {}).await.unwrap().is_empty());
    }
}
