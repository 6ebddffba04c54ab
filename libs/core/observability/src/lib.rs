//! Prometheus metrics for the bulletin board.
//!
//! - a process-wide recorder and the `/metrics` handler
//! - [`metrics_middleware`] for per-route HTTP counters
//! - [`CommentMetrics`] for the comment service
//!
//! ```rust,ignore
//! observability::init_metrics()?;
//! let app = Router::new()
//!     .route("/metrics", get(observability::metrics_handler))
//!     .layer(axum::middleware::from_fn(observability::metrics_middleware));
//! ```
//!
//! Until [`init_metrics`] runs, every recording macro is a no-op.

pub mod comments;
pub mod middleware;

pub use comments::{CommentMetrics, PostOutcome};
pub use middleware::metrics_middleware;

pub use metrics_exporter_prometheus::BuildError;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        register_metric_descriptions();
        info!("Prometheus metrics recorder initialized");
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_errors_total",
        "HTTP responses with a 4xx or 5xx status"
    );

    describe_counter!(
        "comments_posted_total",
        "Comment posts by outcome (created, rejected, failed)"
    );
    describe_counter!("comments_listed_total", "Comment list calls by outcome");
    describe_histogram!(
        "comments_list_duration_seconds",
        "Time spent reading the full comment list"
    );
    describe_gauge!(
        "comments_total",
        "Number of comments returned by the latest full list"
    );
}
