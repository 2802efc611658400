use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::documents::handlers;
use crate::features::documents::services::DocumentService;

pub fn read_routes(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route("/api/documents", get(handlers::list_documents))
        .route("/api/documents/{id}", get(handlers::get_document))
        .with_state(service)
}

pub fn write_routes(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route("/api/documents", post(handlers::create_document))
        .route(
            "/api/documents/{id}",
            put(handlers::update_document).delete(handlers::delete_document),
        )
        .with_state(service)
}
