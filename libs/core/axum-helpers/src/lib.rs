//! # Axum Helpers
//!
//! Shared HTTP plumbing for the bulletin-board services.
//!
//! ## Modules
//!
//! - **[`rpc`]**: tRPC-compatible procedure endpoint (envelopes, batching,
//!   error codes, edge cache policy)
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: JSON error responses for the non-RPC routes

pub mod errors;
pub mod http;
pub mod rpc;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, RouterOptions, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use rpc::{ProcedureKind, RpcCacheConfig, RpcCachePolicy, RpcError, RpcErrorCode, RpcProcedures};
