//! Wire shapes shared by the server and typed clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::codes::RpcErrorCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcSuccess<T> {
    pub result: RpcResultData<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcResultData<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcFailure {
    pub error: RpcErrorShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcErrorShape {
    pub message: String,
    /// JSON-RPC 2.0 error number
    pub code: i32,
    pub data: RpcErrorData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RpcErrorData {
    pub code: RpcErrorCode,
    pub http_status: u16,
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

/// One call's response, as read back by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcEnvelope<T> {
    Success(RpcSuccess<T>),
    Failure(RpcFailure),
}

impl<T> RpcEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success(RpcSuccess {
            result: RpcResultData { data },
        })
    }

    pub fn into_result(self) -> Result<T, RpcErrorShape> {
        match self {
            Self::Success(success) => Ok(success.result.data),
            Self::Failure(failure) => Err(failure.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_reads_data() {
        let envelope: RpcEnvelope<Vec<i64>> =
            serde_json::from_value(json!({"result": {"data": [1, 2, 3]}})).unwrap();
        assert_eq!(envelope.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_error_envelope_reads_shape() {
        let envelope: RpcEnvelope<Vec<i64>> = serde_json::from_value(json!({
            "error": {
                "message": "No \"query\"-procedure on path \"comments.nope\"",
                "code": -32004,
                "data": {"code": "NOT_FOUND", "httpStatus": 404, "path": "comments.nope"}
            }
        }))
        .unwrap();

        let shape = envelope.into_result().unwrap_err();
        assert_eq!(shape.data.code, RpcErrorCode::NotFound);
        assert_eq!(shape.data.http_status, 404);
        assert_eq!(shape.data.path.as_deref(), Some("comments.nope"));
        assert!(shape.data.details.is_none());
    }

    #[test]
    fn test_success_serializes_nested_data() {
        let value = serde_json::to_value(RpcEnvelope::success(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"result": {"data": {"id": 1}}}));
    }
}
