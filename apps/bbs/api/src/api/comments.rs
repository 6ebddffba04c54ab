use axum::Router;
use axum_helpers::RpcCachePolicy;
use domain_comments::{
    CommentService, InMemoryCommentRepository, PUBLIC_PREFIX, PgCommentRepository, handlers,
};

use crate::state::AppState;

/// Comment procedures backed by the configured store.
pub fn router(state: &AppState) -> Router {
    let cache = RpcCachePolicy::new([PUBLIC_PREFIX]).with_config(state.config.cache);

    match &state.db {
        Some(db) => {
            let repository = PgCommentRepository::new(db.clone());
            handlers::router(CommentService::new(repository), cache)
        }
        None => {
            let repository = InMemoryCommentRepository::new();
            handlers::router(CommentService::new(repository), cache)
        }
    }
}
