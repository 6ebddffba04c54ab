//! Application state management.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloned into the routers that need it; the connection is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool, `None` with the in-memory store
    pub db: Option<DatabaseConnection>,
}
