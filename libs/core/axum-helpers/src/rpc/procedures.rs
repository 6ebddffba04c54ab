use async_trait::async_trait;
use axum::{http::Method, response::Response};
use futures::future::join_all;
use serde_json::Value;

use super::cache::RpcCachePolicy;
use super::codes::ProcedureKind;
use super::error::RpcError;
use super::request::{RpcCall, RpcQuery, RpcRequest};
use super::response::{CallOutcome, RpcResponse};

/// A set of named procedures reachable through [`dispatch`].
#[async_trait]
pub trait RpcProcedures: Send + Sync {
    /// Kind of the procedure at `path`, `None` if there is none.
    fn kind(&self, path: &str) -> Option<ProcedureKind>;

    /// Run the procedure at `path`. Only called after [`kind`](Self::kind)
    /// matched the request.
    async fn call(&self, path: &str, input: Option<Value>) -> Result<Value, RpcError>;
}

/// Run every call of `request`. Batched calls run concurrently and keep
/// their order in the response.
pub async fn execute<P>(procedures: &P, request: RpcRequest) -> RpcResponse
where
    P: RpcProcedures + ?Sized,
{
    let kind = request.kind;
    let outcomes = join_all(request.calls.into_iter().map(|RpcCall { path, input }| async move {
        let result = resolve(procedures, kind, &path, input).await;
        CallOutcome { path, result }
    }))
    .await;

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            if e.is_internal() {
                tracing::error!(
                    procedure = %outcome.path,
                    %kind,
                    cause = e.cause.as_deref().unwrap_or("unknown"),
                    "Procedure failed with an internal error"
                );
            } else {
                tracing::debug!(procedure = %outcome.path, code = %e.code, message = %e.message, "Procedure rejected call");
            }
        }
    }

    RpcResponse {
        kind: Some(kind),
        batch: request.batch,
        outcomes,
    }
}

async fn resolve<P>(
    procedures: &P,
    kind: ProcedureKind,
    path: &str,
    input: Option<Value>,
) -> Result<Value, RpcError>
where
    P: RpcProcedures + ?Sized,
{
    match procedures.kind(path) {
        None => Err(RpcError::not_found(format!(
            "No \"{kind}\"-procedure on path \"{path}\""
        ))),
        Some(actual) if actual != kind => Err(RpcError::method_not_supported(format!(
            "Unsupported {}-request to {actual} procedure at path \"{path}\"",
            kind.method()
        ))),
        Some(_) => procedures.call(path, input).await,
    }
}

/// Parse, execute and render one HTTP request against `procedures`.
pub async fn dispatch<P>(
    procedures: &P,
    cache: &RpcCachePolicy,
    method: &Method,
    path: &str,
    query: &RpcQuery,
    body: &[u8],
) -> Response
where
    P: RpcProcedures + ?Sized,
{
    let response = match RpcRequest::parse(method, path, query, body) {
        Ok(request) => execute(procedures, request).await,
        Err(rejection) => {
            tracing::debug!(path, error = %rejection.error, "Rejected RPC request");
            RpcResponse::from(rejection)
        }
    };
    response.into_http(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcErrorCode;
    use axum::http::{StatusCode, header};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// `echo.get` returns its input; `echo.fail` always fails internally;
    /// `echo.set` is a mutation counting its calls.
    #[derive(Default)]
    struct Echo {
        sets: AtomicUsize,
    }

    #[async_trait]
    impl RpcProcedures for Echo {
        fn kind(&self, path: &str) -> Option<ProcedureKind> {
            match path {
                "echo.get" | "echo.fail" => Some(ProcedureKind::Query),
                "echo.set" => Some(ProcedureKind::Mutation),
                _ => None,
            }
        }

        async fn call(&self, path: &str, input: Option<Value>) -> Result<Value, RpcError> {
            match path {
                "echo.get" => Ok(input.unwrap_or(Value::Null)),
                "echo.set" => Ok(json!(self.sets.fetch_add(1, Ordering::SeqCst) + 1)),
                _ => Err(RpcError::internal().with_cause("disk full")),
            }
        }
    }

    fn request(kind: ProcedureKind, batch: bool, calls: &[(&str, Option<Value>)]) -> RpcRequest {
        RpcRequest {
            kind,
            batch,
            calls: calls
                .iter()
                .map(|(path, input)| RpcCall {
                    path: path.to_string(),
                    input: input.clone(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_execute_returns_outputs_in_order() {
        let echo = Echo::default();
        let response = execute(
            &echo,
            request(
                ProcedureKind::Query,
                true,
                &[("echo.get", Some(json!(1))), ("echo.get", Some(json!(2)))],
            ),
        )
        .await;

        assert_eq!(response.body(), json!([{"result": {"data": 1}}, {"result": {"data": 2}}]));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = execute(
            &Echo::default(),
            request(ProcedureKind::Query, false, &[("echo.nope", None)]),
        )
        .await;

        let err = response.outcomes[0].result.as_ref().unwrap_err();
        assert_eq!(err.code, RpcErrorCode::NotFound);
        assert_eq!(err.message, "No \"query\"-procedure on path \"echo.nope\"");
    }

    #[tokio::test]
    async fn test_kind_mismatch_is_method_not_supported_and_not_run() {
        let echo = Echo::default();
        let response = execute(&echo, request(ProcedureKind::Query, false, &[("echo.set", None)])).await;

        let err = response.outcomes[0].result.as_ref().unwrap_err();
        assert_eq!(err.code, RpcErrorCode::MethodNotSupported);
        assert_eq!(
            err.message,
            "Unsupported GET-request to mutation procedure at path \"echo.set\""
        );
        assert_eq!(echo.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_internal_error_keeps_cause_out_of_body() {
        let response = execute(
            &Echo::default(),
            request(ProcedureKind::Query, false, &[("echo.fail", None)]),
        )
        .await;

        let err = response.outcomes[0].result.as_ref().unwrap_err();
        assert_eq!(err.cause.as_deref(), Some("disk full"));
        assert!(!response.body().to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_dispatch_caches_public_query() {
        let policy = RpcCachePolicy::new(["echo"]);
        let query = RpcQuery {
            batch: None,
            input: Some("\"hi\"".to_string()),
        };

        let response = dispatch(&Echo::default(), &policy, &Method::GET, "echo.get", &query, b"").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "s-maxage=30, stale-while-revalidate=0"
        );
    }

    #[tokio::test]
    async fn test_dispatch_mutation_is_uncached() {
        let policy = RpcCachePolicy::new(["echo"]);
        let response = dispatch(
            &Echo::default(),
            &policy,
            &Method::POST,
            "echo.set",
            &RpcQuery::default(),
            b"{}",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_internal_error_in_batch() {
        let policy = RpcCachePolicy::new(["echo"]);
        let query = RpcQuery {
            batch: Some("1".to_string()),
            input: None,
        };

        let response = dispatch(
            &Echo::default(),
            &policy,
            &Method::GET,
            "echo.get,echo.fail",
            &query,
            b"",
        )
        .await;

        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_parse_error() {
        let query = RpcQuery {
            batch: None,
            input: Some("{not json".to_string()),
        };
        let response = dispatch(
            &Echo::default(),
            &RpcCachePolicy::disabled(),
            &Method::GET,
            "echo.get",
            &query,
            b"",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
