use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::codes::RpcErrorCode;
use super::envelope::{RpcErrorData, RpcErrorShape, RpcFailure};

/// Message sent in place of the real cause of an internal error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A failed procedure call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
    /// Structured context for the caller, e.g. per-field validation errors
    pub details: Option<Value>,
    /// Underlying failure, logged next to the procedure path and never sent
    pub cause: Option<String>,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::ParseError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::NotFound, message)
    }

    pub fn method_not_supported(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::MethodNotSupported, message)
    }

    /// Generic message only; attach the real failure with [`with_cause`](Self::with_cause).
    pub fn internal() -> Self {
        Self::new(RpcErrorCode::InternalServerError, INTERNAL_ERROR_MESSAGE)
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_internal(&self) -> bool {
        self.code == RpcErrorCode::InternalServerError
    }

    pub fn to_failure(&self, path: Option<&str>) -> RpcFailure {
        RpcFailure {
            error: RpcErrorShape {
                message: self.message.clone(),
                code: self.code.json_rpc_code(),
                data: RpcErrorData {
                    code: self.code,
                    http_status: self.code.http_status().as_u16(),
                    path: path.map(str::to_string),
                    details: self.details.clone(),
                },
            },
        }
    }
}
