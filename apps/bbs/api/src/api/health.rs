//! Readiness check against the comment store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint.
///
/// Runs `SELECT 1` against Postgres; the in-memory store is always ready.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = match &state.db {
        Some(db) => vec![(
            "database",
            Box::pin(async move {
                database::postgres::check_health(db)
                    .await
                    .map_err(|e| format!("Database check failed: {}", e))
            }),
        )],
        None => vec![("store", Box::pin(async { Ok::<(), String>(()) }))],
    };

    run_health_checks(checks).await.into_response()
}
