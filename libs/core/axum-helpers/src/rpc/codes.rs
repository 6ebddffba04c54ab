use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Error codes carried in `error.data.code`, each paired with its JSON-RPC
/// number and HTTP status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorCode {
    /// The input could not be read as JSON
    ParseError,
    /// The input was JSON but failed the procedure's schema
    BadRequest,
    /// No procedure at the requested path
    NotFound,
    /// HTTP method does not match the procedure kind
    MethodNotSupported,
    InternalServerError,
}

impl RpcErrorCode {
    pub fn json_rpc_code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::BadRequest => -32600,
            Self::InternalServerError => -32603,
            Self::NotFound => -32004,
            Self::MethodNotSupported => -32005,
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Self::ParseError | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Query procedures are read-only and travel as GET; mutations travel as POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Query),
            Method::POST => Some(Self::Mutation),
            _ => None,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::Query => Method::GET,
            Self::Mutation => Method::POST,
        }
    }
}
