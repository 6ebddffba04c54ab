use axum::http::Method;
use serde::Deserialize;
use serde_json::Value;

use super::codes::ProcedureKind;
use super::error::RpcError;

/// Query string of an RPC request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcQuery {
    pub batch: Option<String>,
    /// JSON-encoded input of a GET request
    pub input: Option<String>,
}

impl RpcQuery {
    pub fn is_batch(&self) -> bool {
        matches!(self.batch.as_deref(), Some("1" | "true"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    pub path: String,
    pub input: Option<Value>,
}

/// A parsed request: one call, or a batch of calls of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub kind: ProcedureKind,
    pub batch: bool,
    pub calls: Vec<RpcCall>,
}

/// A request that could not be parsed. Still carries the paths so the
/// response can be shaped like the one the caller expects.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRejection {
    pub kind: Option<ProcedureKind>,
    pub batch: bool,
    pub paths: Vec<String>,
    pub error: RpcError,
}

impl RpcRequest {
    /// Parse the method, the `{procedures}` path segment, the query string
    /// and the body into calls.
    ///
    /// GET reads its input from `?input=`, POST from the body. In a batch the
    /// input is an object keyed by call index (`{"0": .., "1": ..}`).
    pub fn parse(
        method: &Method,
        procedures: &str,
        query: &RpcQuery,
        body: &[u8],
    ) -> Result<Self, RpcRejection> {
        let batch = query.is_batch();
        let paths: Vec<String> = if batch {
            procedures.split(',').map(|p| p.trim().to_string()).collect()
        } else {
            vec![procedures.to_string()]
        };

        let reject = |kind: Option<ProcedureKind>, error: RpcError| RpcRejection {
            kind,
            batch,
            paths: paths.clone(),
            error,
        };

        let Some(kind) = ProcedureKind::from_method(method) else {
            return Err(reject(
                None,
                RpcError::method_not_supported(format!("Unsupported {method}-request")),
            ));
        };

        let raw = match kind {
            ProcedureKind::Query => query.input.as_deref().map(str::as_bytes),
            ProcedureKind::Mutation => Some(body).filter(|b| !b.iter().all(u8::is_ascii_whitespace)),
        };

        let input = match raw {
            Some(bytes) => Some(
                serde_json::from_slice::<Value>(bytes)
                    .map_err(|e| reject(Some(kind), RpcError::parse_error(format!("Invalid JSON input: {e}"))))?,
            ),
            None => None,
        };

        let calls = if batch {
            let mut inputs = match input {
                None => serde_json::Map::new(),
                Some(Value::Object(map)) => map,
                Some(_) => {
                    return Err(reject(
                        Some(kind),
                        RpcError::parse_error("Batch input must be an object keyed by call index"),
                    ));
                }
            };
            paths
                .iter()
                .enumerate()
                .map(|(index, path)| RpcCall {
                    path: path.clone(),
                    input: inputs.remove(&index.to_string()),
                })
                .collect()
        } else {
            vec![RpcCall {
                path: procedures.to_string(),
                input,
            }]
        };

        Ok(Self { kind, batch, calls })
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().map(|c| c.path.as_str())
    }
}
