use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::news::handlers;
use crate::features::news::services::NewsService;

/// Read-only news routes
pub fn read_routes(service: Arc<NewsService>) -> Router {
    Router::new()
        .route("/api/news", get(handlers::list_news))
        .route("/api/news/{id}", get(handlers::get_news))
        .with_state(service)
}

/// News routes that modify data (always behind authentication)
pub fn write_routes(service: Arc<NewsService>) -> Router {
    Router::new()
        .route("/api/news", post(handlers::create_news))
        .route(
            "/api/news/{id}",
            put(handlers::update_news).delete(handlers::delete_news),
        )
        .with_state(service)
}
