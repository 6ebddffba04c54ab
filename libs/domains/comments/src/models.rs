use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Author stored when a comment is posted without one.
pub const ANONYMOUS_AUTHOR: &str = "anonymous";

/// A stored comment. Never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Assigned by the store, strictly increasing in insertion order
    pub id: i64,
    pub author: String,
    /// Only used to render a `mailto:` link
    pub email: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Input of `comments.post`.
///
/// Both the server and [`crate::client::CommentForm`] validate against this
/// one definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// A missing body deserializes as empty and fails validation.
    #[serde(default)]
    #[validate(length(min = 1, message = "Comment body must not be empty"))]
    #[schema(min_length = 1)]
    pub body: String,
}

impl PostComment {
    /// Empty `author`/`email` become absent, so the default author applies.
    pub fn normalized(self) -> Self {
        Self {
            author: self.author.filter(|a| !a.is_empty()),
            email: self.email.filter(|e| !e.is_empty()),
            body: self.body,
        }
    }
}

/// Input of `comments.list`. Takes no parameters yet; unknown fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListComments {}

/// A validated comment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub author: String,
    pub email: Option<String>,
    pub body: String,
}

impl From<PostComment> for NewComment {
    fn from(input: PostComment) -> Self {
        let input = input.normalized();
        Self {
            author: input
                .author
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            email: input.email,
            body: input.body,
        }
    }
}
