//! Router assembly shared by the server binary and the HTTP tests

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{
    routes as auth_routes, AuthService, JwtValidator, PgUserRepository, TokenService,
};
use crate::features::documents::{routes as documents_routes, DocumentService, PgDocumentRepository};
use crate::features::news::{routes as news_routes, NewsService, PgNewsRepository};
use crate::features::stations::{routes as stations_routes, PgStationRepository, StationService};
use crate::modules::storage::AttachmentManager;

/// Services the router hands to its handlers
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub validator: Arc<JwtValidator>,
    pub news: Arc<NewsService>,
    pub documents: Arc<DocumentService>,
    pub stations: Arc<StationService>,
}

impl AppServices {
    /// Wire the PostgreSQL-backed services
    pub fn postgres(pool: PgPool, config: &Config, attachments: Arc<AttachmentManager>) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let tokens = Arc::new(TokenService::new(&config.auth));

        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                Arc::clone(&tokens),
                config.admin.clone(),
            )),
            validator: Arc::new(JwtValidator::new(tokens, users)),
            news: Arc::new(NewsService::new(
                Arc::new(PgNewsRepository::new(pool.clone())),
                Arc::clone(&attachments),
            )),
            documents: Arc::new(DocumentService::new(
                Arc::new(PgDocumentRepository::new(pool.clone())),
                attachments,
            )),
            stations: Arc::new(StationService::new(Arc::new(PgStationRepository::new(pool)))),
        }
    }
}

fn swagger_routes(config: &Config) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    }
    .modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match config.swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            swagger.layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::basic_auth_middleware,
            ))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            swagger
        }
    }
}

pub fn build_router(config: &Config, services: AppServices) -> Router {
    let read_routes = Router::new()
        .merge(news_routes::read_routes(Arc::clone(&services.news)))
        .merge(documents_routes::read_routes(Arc::clone(&services.documents)))
        .merge(stations_routes::read_routes(Arc::clone(&services.stations)));

    let mut protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(news_routes::write_routes(Arc::clone(&services.news)))
        .merge(documents_routes::write_routes(Arc::clone(&services.documents)))
        .merge(stations_routes::write_routes(Arc::clone(&services.stations)));

    let mut public_routes =
        Router::new().merge(auth_routes::public_routes(Arc::clone(&services.auth)));

    if config.app.public_read_endpoints {
        public_routes = public_routes.merge(read_routes);
    } else {
        tracing::info!("Read endpoints require authentication");
        protected_routes = protected_routes.merge(read_routes);
    }

    let protected_routes = protected_routes.route_layer(from_fn_with_state(
        Arc::clone(&services.validator),
        middleware::auth_middleware,
    ));

    if config.admin.enabled {
        tracing::warn!("Admin bootstrap endpoint enabled at /api/auth/init-admin");
        public_routes = public_routes.merge(auth_routes::bootstrap_routes(services.auth));
    }

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", get(health_check));

    let uploads = ServeDir::new(&config.storage.upload_dir);

    Router::new()
        .merge(swagger_routes(config))
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .nest_service(&config.storage.public_prefix, uploads)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
