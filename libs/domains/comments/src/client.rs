//! Typed caller for the comment procedures, plus the list view-model a UI
//! keeps between calls.
//!
//! ```rust,no_run
//! use domain_comments::{CommentFeed, CommentForm, CommentsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CommentsClient::new("http://localhost:8080");
//! let mut feed = CommentFeed::default();
//! feed.load(client.list().await?);
//!
//! let form = CommentForm {
//!     author: String::new(),
//!     email: String::new(),
//!     body: "hello".to_string(),
//! };
//! form.validate()?;
//! let created = client.post(form.to_input()).await?;
//! feed.append(created)?;
//! # Ok(())
//! # }
//! ```

use axum_helpers::rpc::{RpcEnvelope, RpcErrorCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::handlers::{LIST_PROCEDURE, POST_PROCEDURE};
use crate::models::{Comment, ListComments, PostComment};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error envelope
    #[error("{code} ({http_status}): {message}")]
    Rpc {
        code: RpcErrorCode,
        message: String,
        http_status: u16,
    },

    /// Connection failure, or a response that is not an envelope
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rejected locally; nothing was sent
    #[error("Invalid comment: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Client for `{base}/api/trpc`. Calls are never retried.
#[derive(Debug, Clone)]
pub struct CommentsClient {
    http: reqwest::Client,
    base_url: String,
}

impl CommentsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn procedure_url(&self, path: &str) -> String {
        format!("{}/api/trpc/{}", self.base_url, path)
    }

    /// Every comment, ascending by id.
    pub async fn list(&self) -> Result<Vec<Comment>, ClientError> {
        let input = serde_json::to_string(&ListComments {})?;
        let url = format!(
            "{}?input={}",
            self.procedure_url(LIST_PROCEDURE),
            urlencoding::encode(&input)
        );

        let response = self.http.get(url).send().await?;
        read_envelope(response).await
    }

    /// Validates locally first; an invalid comment never reaches the network.
    pub async fn post(&self, input: PostComment) -> Result<Comment, ClientError> {
        input.validate()?;

        let response = self
            .http
            .post(self.procedure_url(POST_PROCEDURE))
            .json(&input)
            .send()
            .await?;
        read_envelope(response).await
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let envelope: RpcEnvelope<T> = response.json().await?;
    envelope.into_result().map_err(|error| {
        tracing::debug!(code = %error.data.code, message = %error.message, "Procedure call failed");
        ClientError::Rpc {
            code: error.data.code,
            message: error.message,
            http_status: error.data.http_status,
        }
    })
}

/// Raw fields of the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub author: String,
    pub email: String,
    pub body: String,
}

impl CommentForm {
    /// Empty author/email are sent as absent.
    pub fn to_input(&self) -> PostComment {
        PostComment {
            author: Some(self.author.clone()),
            email: Some(self.email.clone()),
            body: self.body.clone(),
        }
        .normalized()
    }

    /// The form guard, run before submitting.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.to_input().validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("comment {id} does not follow the newest loaded comment {newest}")]
    OutOfOrder { id: i64, newest: i64 },
}

/// Comments as last shown, ascending by id.
///
/// A post appends its result instead of reloading, which only matches a
/// later reload if the new id is the largest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentFeed {
    comments: Vec<Comment>,
}

impl CommentFeed {
    pub fn load(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    pub fn append(&mut self, comment: Comment) -> Result<(), FeedError> {
        match self.newest_id() {
            Some(newest) if comment.id <= newest => {
                return Err(FeedError::OutOfOrder {
                    id: comment.id,
                    newest,
                });
            }
            _ => {}
        }
        self.comments.push(comment);
        Ok(())
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn newest_id(&self) -> Option<i64> {
        self.comments.last().map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// `mailto:` link for the author, if they left an email.
pub fn mailto(comment: &Comment) -> Option<String> {
    comment
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .map(|email| format!("mailto:{email}"))
}
