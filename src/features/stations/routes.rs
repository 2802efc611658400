use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::stations::handlers;
use crate::features::stations::services::StationService;

pub fn read_routes(service: Arc<StationService>) -> Router {
    Router::new()
        .route("/api/stations", get(handlers::list_stations))
        .route("/api/stations/{id}", get(handlers::get_station))
        .with_state(service)
}

pub fn write_routes(service: Arc<StationService>) -> Router {
    Router::new()
        .route("/api/stations", post(handlers::create_station))
        .route(
            "/api/stations/{id}",
            put(handlers::update_station).delete(handlers::delete_station),
        )
        .with_state(service)
}
