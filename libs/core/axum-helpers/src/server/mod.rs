//! Server bootstrap: router assembly, health endpoints, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{RouterOptions, create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, RouterOptions::default())
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(10), async { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{RouterOptions, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::shutdown_signal;
