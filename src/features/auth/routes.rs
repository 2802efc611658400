use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/verify", post(handlers::verify))
        .with_state(service)
}

/// Admin bootstrap route, mounted only when enabled in config
pub fn bootstrap_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/init-admin", post(handlers::init_admin))
        .with_state(service)
}
