use axum::{Router, routing::get};

pub mod comments;
pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().merge(comments::router(state))
}

/// Creates a router with the /ready endpoint that checks the comment store.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Prometheus scrape endpoint
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(observability::metrics_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, StoreKind};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::{RouterOptions, RpcCacheConfig, create_router, health_router};
    use core_config::{app_info, server::ServerConfig};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn memory_state() -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                environment: Environment::Development,
                server: ServerConfig::default(),
                store: StoreKind::Memory,
                database: None,
                run_migrations: false,
                cache: RpcCacheConfig::default(),
            },
            db: None,
        }
    }

    fn app() -> Router {
        let state = memory_state();
        create_router::<crate::openapi::ApiDoc>(routes(&state), RouterOptions::default())
            .merge(health_router(state.config.app))
            .merge(ready_router(state))
            .merge(metrics_router())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_rpc_is_served_under_api() {
        let app = app();

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/trpc/comments.post")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"body":"hello"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["data"]["author"], "anonymous");

        let (status, headers, body) = send(
            &app,
            Request::builder()
                .uri("/api/trpc/comments.list?input=%7B%7D")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "s-maxage=30, stale-while-revalidate=0"
        );
        assert_eq!(body["result"]["data"][0]["body"], "hello");
    }

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let (status, _, body) = send(
            &app(),
            Request::builder().uri("/ready").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ready", "store": "connected" }));
    }

    #[tokio::test]
    async fn test_health_reports_app_info() {
        let (status, _, body) = send(
            &app(),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "bbs_api");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_rpc_endpoint() {
        let (status, _, body) = send(
            &app(),
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/trpc/{procedures}").is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, _, body) = send(
            &app(),
            Request::builder().uri("/nope").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }
}
