use super::shutdown::shutdown_signal;
use crate::errors::handlers::not_found;
use crate::http::security::security_headers;
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Cross-cutting settings applied by [`create_router`].
#[derive(Clone, Debug)]
pub struct RouterOptions {
    /// `None` serves same-origin only
    pub cors: Option<CorsLayer>,
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Wrap the API routes with documentation and middleware.
///
/// - `apis` is nested under `/api`
/// - Swagger UI at `/docs`, ReDoc at `/redoc`, RapiDoc at `/rapidoc`,
///   Scalar at `/scalar`, raw document at `/api-docs/openapi.json`
/// - request tracing, security headers, optional CORS, per-request
///   timeout, response compression
/// - JSON 404 fallback
///
/// Routes merged after this call (health, metrics) skip the `/api` prefix
/// but not the layers added later by the caller.
pub fn create_router<T>(apis: Router, options: RouterOptions) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found);

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(options.request_timeout);

    let router = router
        .layer(timeout)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match options.cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(CompressionLayer::new())
}

/// Serve `router` until SIGINT/SIGTERM, let in-flight requests finish,
/// then run `cleanup` for at most `cleanup_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!(address = %listener.local_addr()?, "Server listening");

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Server encountered an error"));

    info!(timeout = ?cleanup_timeout, "Running shutdown cleanup");
    if tokio::time::timeout(cleanup_timeout, cleanup).await.is_err() {
        tracing::warn!(timeout = ?cleanup_timeout, "Cleanup timed out, exiting anyway");
    }

    serve_result
}
