use axum_helpers::RpcError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Invalid comment: {0}")]
    Validation(#[from] ValidationErrors),

    /// Input that could not be decoded into the procedure's input type
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CommentResult<T> = Result<T, CommentError>;

/// Store and internal failures reach the caller only as a generic internal
/// error; the cause rides along for the log.
impl From<CommentError> for RpcError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::Validation(errors) => {
                let details = serde_json::to_value(&errors).ok();
                let error = RpcError::bad_request(errors.to_string());
                match details {
                    Some(details) => error.with_details(details),
                    None => error,
                }
            }
            CommentError::InvalidInput(msg) => RpcError::bad_request(msg),
            CommentError::Database(e) => RpcError::internal().with_cause(e),
            CommentError::Internal(msg) => RpcError::internal().with_cause(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostComment;
    use axum_helpers::RpcErrorCode;
    use validator::Validate;

    fn validation_error() -> CommentError {
        PostComment::default().validate().unwrap_err().into()
    }

    #[test]
    fn test_validation_maps_to_bad_request_with_details() {
        let rpc: RpcError = validation_error().into();

        assert_eq!(rpc.code, RpcErrorCode::BadRequest);
        assert!(rpc.message.contains("body"));
        let details = rpc.details.unwrap();
        assert!(details.get("body").is_some());
    }

    #[test]
    fn test_database_error_is_not_echoed() {
        let err = CommentError::Database(DbErr::Custom("password=hunter2".to_string()));
        let rpc: RpcError = err.into();

        assert_eq!(rpc.code, RpcErrorCode::InternalServerError);
        assert!(!rpc.message.contains("hunter2"));
        assert!(rpc.details.is_none());
        assert!(rpc.cause.unwrap().contains("hunter2"));
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let rpc: RpcError = CommentError::InvalidInput("expected an object".into()).into();

        assert_eq!(rpc.code, RpcErrorCode::BadRequest);
        assert_eq!(rpc.message, "expected an object");
        assert!(rpc.cause.is_none());
    }
}
