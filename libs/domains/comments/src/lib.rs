//! Comments Domain
//!
//! The bulletin board's only entity: comments that anyone can list and post.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐
//! │  Handlers   │   │   Client    │  ← RPC endpoint / typed caller + feed
//! └──────┬──────┘   └──────┬──────┘
//!        │                 │ HTTP
//! ┌──────▼──────┐          │
//! │   Service   │ ◄────────┘  ← validation, defaults
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← one INSERT / one ordered SELECT (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Comment, PostComment, ListComments
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::RpcCachePolicy;
//! use domain_comments::{
//!     handlers,
//!     repository::InMemoryCommentRepository,
//!     service::CommentService,
//! };
//!
//! let repository = InMemoryCommentRepository::new();
//! let service = CommentService::new(repository);
//!
//! // Mounts /trpc/{procedures}
//! let router = handlers::router(service, RpcCachePolicy::new(["comments"]));
//! ```

pub mod client;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use client::{ClientError, CommentFeed, CommentForm, CommentsClient, FeedError, mailto};
pub use error::{CommentError, CommentResult};
pub use handlers::{CommentProcedures, LIST_PROCEDURE, POST_PROCEDURE, PUBLIC_PREFIX};
pub use models::{ANONYMOUS_AUTHOR, Comment, ListComments, NewComment, PostComment};
pub use postgres::PgCommentRepository;
pub use repository::{CommentRepository, InMemoryCommentRepository};
pub use service::CommentService;
