use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::cache::RpcCachePolicy;
use super::codes::ProcedureKind;
use super::envelope::RpcEnvelope;
use super::error::RpcError;
use super::request::RpcRejection;

#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub path: String,
    pub result: Result<Value, RpcError>,
}

impl CallOutcome {
    pub fn status(&self) -> StatusCode {
        match &self.result {
            Ok(_) => StatusCode::OK,
            Err(e) => e.code.http_status(),
        }
    }

    fn to_json(&self) -> Value {
        let envelope = match &self.result {
            Ok(data) => serde_json::to_value(RpcEnvelope::success(data)),
            Err(e) => serde_json::to_value(e.to_failure(Some(&self.path))),
        };
        envelope.unwrap_or(Value::Null)
    }
}

/// Outcomes of every call in a request, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    /// `None` when the HTTP method maps to no procedure kind
    pub kind: Option<ProcedureKind>,
    pub batch: bool,
    pub outcomes: Vec<CallOutcome>,
}

impl RpcResponse {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|o| o.path.as_str())
    }

    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_err())
    }

    /// The shared status of all calls, or 207 when they differ.
    pub fn status(&self) -> StatusCode {
        let mut statuses = self.outcomes.iter().map(CallOutcome::status);
        let Some(first) = statuses.next() else {
            return StatusCode::OK;
        };
        if statuses.all(|s| s == first) {
            first
        } else {
            StatusCode::MULTI_STATUS
        }
    }

    pub fn body(&self) -> Value {
        if self.batch {
            Value::Array(self.outcomes.iter().map(CallOutcome::to_json).collect())
        } else {
            self.outcomes.first().map(CallOutcome::to_json).unwrap_or(Value::Null)
        }
    }

    pub fn into_http(self, cache: &RpcCachePolicy) -> Response {
        let cache_control = cache.header_value(&self);
        let mut response = (self.status(), Json(self.body())).into_response();
        if let Some(value) = cache_control {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
        response
    }
}

impl From<RpcRejection> for RpcResponse {
    /// Every requested call fails with the rejection's error.
    fn from(rejection: RpcRejection) -> Self {
        let outcomes = rejection
            .paths
            .into_iter()
            .map(|path| CallOutcome {
                path,
                result: Err(rejection.error.clone()),
            })
            .collect();

        Self {
            kind: rejection.kind,
            batch: rejection.batch,
            outcomes,
        }
    }
}
