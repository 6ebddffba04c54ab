//! Client tests for the Comments domain
//!
//! The router is served on an ephemeral port and called through
//! `CommentsClient`, the way a browser-side caller would.

use async_trait::async_trait;
use axum::Router;
use axum_helpers::{RpcCachePolicy, RpcErrorCode};
use domain_comments::*;
use sea_orm::DbErr;
use tokio::net::TcpListener;

/// A store that is always down
struct UnavailableRepository;

#[async_trait]
impl CommentRepository for UnavailableRepository {
    async fn insert(&self, _comment: NewComment) -> CommentResult<Comment> {
        Err(DbErr::Custom("connection refused".to_string()).into())
    }

    async fn list(&self) -> CommentResult<Vec<Comment>> {
        Err(DbErr::Custom("connection refused".to_string()).into())
    }

    async fn count(&self) -> CommentResult<u64> {
        Err(DbErr::Custom("connection refused".to_string()).into())
    }
}

async fn spawn_server() -> String {
    serve(InMemoryCommentRepository::new()).await
}

async fn serve<R: CommentRepository + 'static>(repository: R) -> String {
    let service = CommentService::new(repository);
    let app = Router::new().nest(
        "/api",
        handlers::router(service, RpcCachePolicy::new([PUBLIC_PREFIX])),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_post_then_list_through_client() {
    let client = CommentsClient::new(spawn_server().await);

    assert!(client.list().await.unwrap().is_empty());

    let created = client
        .post(PostComment {
            body: "hello".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.author, ANONYMOUS_AUTHOR);
    assert_eq!(created.email, None);

    let listed = client.list().await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_form_feed_round() {
    let client = CommentsClient::new(spawn_server().await);
    let mut feed = CommentFeed::default();
    feed.load(client.list().await.unwrap());

    for body in ["first", "second"] {
        let form = CommentForm {
            author: String::new(),
            email: "me@example.com".to_string(),
            body: body.to_string(),
        };
        form.validate().unwrap();
        let created = client.post(form.to_input()).await.unwrap();
        feed.append(created).unwrap();
    }

    let mut reloaded = CommentFeed::default();
    reloaded.load(client.list().await.unwrap());
    assert_eq!(feed, reloaded);
    assert_eq!(
        mailto(&feed.comments()[0]).as_deref(),
        Some("mailto:me@example.com")
    );
}

#[tokio::test]
async fn test_invalid_post_is_rejected_before_sending() {
    // Nothing listens here; a request would fail with an HTTP error
    let client = CommentsClient::new("http://127.0.0.1:9");

    let result = client.post(PostComment::default()).await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn test_server_guard_rejects_empty_body() {
    let base = spawn_server().await;

    // Bypass the local guard to reach the server-side one
    let response = reqwest::Client::new()
        .post(format!("{base}/api/trpc/comments.post"))
        .json(&serde_json::json!({ "body": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let client = CommentsClient::new(base);
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_decodes_as_rpc_error() {
    let client = CommentsClient::new(serve(UnavailableRepository).await);

    let err = client.list().await.unwrap_err();

    match err {
        ClientError::Rpc {
            code,
            message,
            http_status,
        } => {
            assert_eq!(code, RpcErrorCode::InternalServerError);
            assert_eq!(message, "Internal server error");
            assert_eq!(http_status, 500);
        }
        other => panic!("expected an RPC error, got {other:?}"),
    }

    let err = client
        .post(PostComment {
            body: "lost".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(!err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let client = CommentsClient::new("http://127.0.0.1:9");

    let result = client.list().await;

    assert!(matches!(result, Err(ClientError::Http(_))));
}

#[tokio::test]
async fn test_rpc_error_fields() {
    let err = ClientError::Rpc {
        code: RpcErrorCode::BadRequest,
        message: "body: Comment body must not be empty".to_string(),
        http_status: 400,
    };
    assert_eq!(
        err.to_string(),
        "BAD_REQUEST (400): body: Comment body must not be empty"
    );
}
