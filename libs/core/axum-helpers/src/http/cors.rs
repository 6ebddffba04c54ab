use axum::http::{HeaderValue, Method, header};
use core_config::ConfigError;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS for the RPC endpoint: GET and POST calls plus preflight, JSON
/// bodies, no credentials (every procedure is public).
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Split a comma-separated origin list, skipping blanks.
pub fn parse_allowed_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: format!("{s}: {e}"),
            })
        })
        .collect()
}

/// Layer built from `CORS_ALLOWED_ORIGIN`, or `None` when unset or empty
/// (same-origin deployment behind the edge).
pub fn cors_layer_from_env() -> Result<Option<CorsLayer>, ConfigError> {
    let raw = std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_default();
    let origins = parse_allowed_origins(&raw)?;
    if origins.is_empty() {
        return Ok(None);
    }

    tracing::info!(origins = %raw, "CORS enabled");
    Ok(Some(create_cors_layer(origins)))
}
