use crate::features::search::handlers;
use crate::features::search::services::SearchService;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Protected search routes (require JWT authentication)
pub fn protected_routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/search", get(handlers::search))
        .route("/api/keywords/frequent", get(handlers::frequent_keywords))
        .with_state(service)
}
