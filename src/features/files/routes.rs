use crate::features::files::handlers;
use crate::features::files::services::FileService;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Protected file routes (require JWT authentication)
pub fn protected_routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/api/files", get(handlers::list))
        .route("/api/files/upload", post(handlers::upload))
        .route("/api/files/download-batch", post(handlers::download_batch))
        .route("/api/files/{filename}", delete(handlers::delete))
        .route("/api/files/{filename}/download", get(handlers::download))
        .with_state(service)
}
