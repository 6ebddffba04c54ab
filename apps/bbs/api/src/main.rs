//! Bulletin board API
//!
//! Serves the `comments.list` / `comments.post` procedures at
//! `/api/trpc/{procedures}`, plus `/health`, `/ready`, `/metrics` and `/docs`.

use axum_helpers::server::{RouterOptions, create_production_app, health_router};
use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_comments::{CommentService, PgCommentRepository};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreKind};
use state::AppState;

#[derive(Parser)]
#[command(name = "bbs-api")]
#[command(about = "Bulletin board comment service")]
struct Cli {
    /// Keep comments in process memory instead of Postgres (same as STORE=memory)
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();

    // Load configuration from environment variables
    let config = Config::from_env(cli.in_memory)?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    observability::init_metrics()?;

    let db = match (config.store, config.database.clone()) {
        (StoreKind::Postgres, Some(database)) => {
            let db = database::postgres::connect_from_config_with_retry(database, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            if config.run_migrations {
                database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                    .await
                    .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
            }

            let total = CommentService::new(PgCommentRepository::new(db.clone()))
                .count()
                .await
                .map_err(|e| eyre::eyre!("Comment store is not usable: {}", e))?;
            info!(comments = total, "Comment store ready");

            Some(db)
        }
        (StoreKind::Postgres, None) => {
            return Err(eyre::eyre!("Postgres store selected without database configuration"));
        }
        (StoreKind::Memory, _) => {
            warn!("Using the in-memory comment store; comments are lost on restart");
            None
        }
    };

    let state = AppState { config, db };

    let options = RouterOptions {
        cors: axum_helpers::cors_layer_from_env()?,
        request_timeout: state.config.server.request_timeout,
    };

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(&state), options);

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the comment store
    // - /metrics: Prometheus scrape endpoint
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .merge(api::metrics_router())
        .layer(axum::middleware::from_fn(observability::metrics_middleware));

    info!(store = %state.config.store, "Starting bulletin board API");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30), // 30s graceful shutdown timeout
        async move {
            if let Some(db) = state.db {
                info!("Shutting down: closing database connections");
                match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Bulletin board API shutdown complete");
    Ok(())
}
