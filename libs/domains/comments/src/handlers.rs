use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::Response,
    routing::get,
};
use axum_helpers::rpc::{
    self, ProcedureKind, RpcCachePolicy, RpcError, RpcFailure, RpcProcedures, RpcQuery, RpcSuccess,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, ListComments, PostComment};
use crate::repository::CommentRepository;
use crate::service::CommentService;

pub const LIST_PROCEDURE: &str = "comments.list";
pub const POST_PROCEDURE: &str = "comments.post";

/// Every procedure under this prefix is public and its queries cacheable.
pub const PUBLIC_PREFIX: &str = "comments";

const TAG: &str = "comments";

/// OpenAPI documentation for the comments RPC endpoint
#[derive(OpenApi)]
#[openapi(
    paths(query_procedures, mutate_procedures),
    components(schemas(Comment, PostComment, ListComments, RpcFailure)),
    tags(
        (name = TAG, description = "Bulletin board comments over tRPC-style procedures")
    )
)]
pub struct ApiDoc;

/// `comments.list` (query) and `comments.post` (mutation).
pub struct CommentProcedures<R: CommentRepository> {
    service: CommentService<R>,
}

impl<R: CommentRepository> CommentProcedures<R> {
    pub fn new(service: CommentService<R>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: CommentRepository + 'static> RpcProcedures for CommentProcedures<R> {
    fn kind(&self, path: &str) -> Option<ProcedureKind> {
        match path {
            LIST_PROCEDURE => Some(ProcedureKind::Query),
            POST_PROCEDURE => Some(ProcedureKind::Mutation),
            _ => None,
        }
    }

    async fn call(&self, path: &str, input: Option<Value>) -> Result<Value, RpcError> {
        match path {
            LIST_PROCEDURE => {
                let input: ListComments = decode_input(input)?;
                Ok(encode_output(self.service.list(input).await?)?)
            }
            POST_PROCEDURE => {
                let input: PostComment = decode_input(input)?;
                Ok(encode_output(self.service.post(input).await?)?)
            }
            _ => Err(RpcError::not_found(format!("No procedure on path \"{path}\""))),
        }
    }
}

/// Absent or `null` input decodes as the type's default.
fn decode_input<T: DeserializeOwned + Default>(input: Option<Value>) -> CommentResult<T> {
    match input {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| CommentError::InvalidInput(e.to_string()))
        }
    }
}

fn encode_output<T: Serialize>(output: T) -> CommentResult<Value> {
    serde_json::to_value(output).map_err(|e| CommentError::Internal(e.to_string()))
}

struct CommentRpc<R: CommentRepository> {
    procedures: CommentProcedures<R>,
    cache: RpcCachePolicy,
}

/// Create the comments router, mounting `/trpc/{procedures}`
pub fn router<R: CommentRepository + 'static>(
    service: CommentService<R>,
    cache: RpcCachePolicy,
) -> Router {
    let state = Arc::new(CommentRpc {
        procedures: CommentProcedures::new(service),
        cache,
    });

    Router::new()
        .route(
            "/trpc/{procedures}",
            get(query_procedures)
                .post(mutate_procedures)
                .options(preflight)
                .fallback(unsupported_method),
        )
        .with_state(state)
}

/// Run query procedures (`comments.list`)
///
/// Single call: `?input=<json>`. Batch: `?batch=1&input={"0":...,"1":...}`
/// with comma-separated paths. Error-free public queries carry a
/// `cache-control` header for the edge.
#[utoipa::path(
    get,
    path = "/{procedures}",
    tag = TAG,
    params(
        ("procedures" = String, Path, description = "Procedure path, or comma-separated paths in a batch"),
        ("input" = Option<String>, Query, description = "JSON-encoded input"),
        ("batch" = Option<String>, Query, description = "`1` for a batched call")
    ),
    responses(
        (status = 200, description = "Comments ascending by id", body = RpcSuccess<Vec<Comment>>),
        (status = 207, description = "Batch with mixed outcomes"),
        (status = 400, description = "Malformed input", body = RpcFailure),
        (status = 404, description = "Unknown procedure", body = RpcFailure),
        (status = 405, description = "Mutation called with GET", body = RpcFailure),
        (status = 500, description = "Store failure", body = RpcFailure)
    )
)]
async fn query_procedures<R: CommentRepository + 'static>(
    State(state): State<Arc<CommentRpc<R>>>,
    Path(procedures): Path<String>,
    Query(query): Query<RpcQuery>,
) -> Response {
    rpc::dispatch(&state.procedures, &state.cache, &Method::GET, &procedures, &query, &[]).await
}

/// Run mutation procedures (`comments.post`)
///
/// The input is the request body; in a batch, an object keyed by call index.
/// A retried post stores a second comment.
#[utoipa::path(
    post,
    path = "/{procedures}",
    tag = TAG,
    params(
        ("procedures" = String, Path, description = "Procedure path, or comma-separated paths in a batch"),
        ("batch" = Option<String>, Query, description = "`1` for a batched call")
    ),
    request_body = PostComment,
    responses(
        (status = 200, description = "The stored comment", body = RpcSuccess<Comment>),
        (status = 400, description = "Empty body or malformed input", body = RpcFailure),
        (status = 404, description = "Unknown procedure", body = RpcFailure),
        (status = 405, description = "Query called with POST", body = RpcFailure),
        (status = 500, description = "Store failure", body = RpcFailure)
    )
)]
async fn mutate_procedures<R: CommentRepository + 'static>(
    State(state): State<Arc<CommentRpc<R>>>,
    Path(procedures): Path<String>,
    Query(query): Query<RpcQuery>,
    body: Bytes,
) -> Response {
    rpc::dispatch(&state.procedures, &state.cache, &Method::POST, &procedures, &query, &body).await
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn unsupported_method<R: CommentRepository + 'static>(
    State(state): State<Arc<CommentRpc<R>>>,
    method: Method,
    Path(procedures): Path<String>,
    Query(query): Query<RpcQuery>,
) -> Response {
    rpc::dispatch(&state.procedures, &state.cache, &method, &procedures, &query, &[]).await
}
