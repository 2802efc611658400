use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};
use crate::features::news::{dtos as news_dtos, handlers as news_handlers};
use crate::features::stations::{dtos as stations_dtos, handlers as stations_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::verify,
        auth::handlers::init_admin,
        // News
        news_handlers::create_news,
        news_handlers::list_news,
        news_handlers::get_news,
        news_handlers::update_news,
        news_handlers::delete_news,
        // Documents
        documents_handlers::create_document,
        documents_handlers::list_documents,
        documents_handlers::get_document,
        documents_handlers::update_document,
        documents_handlers::delete_document,
        // Stations
        stations_handlers::create_station,
        stations_handlers::list_stations,
        stations_handlers::get_station,
        stations_handlers::update_station,
        stations_handlers::delete_station,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::LoginRequestDto,
            auth::dtos::TokenResponseDto,
            auth::dtos::VerifyResponseDto,
            auth::dtos::InitAdminResponseDto,
            ApiResponse<auth::dtos::TokenResponseDto>,
            ApiResponse<auth::dtos::VerifyResponseDto>,
            ApiResponse<auth::dtos::InitAdminResponseDto>,
            // News
            news_dtos::CreateNewsDto,
            news_dtos::UpdateNewsDto,
            news_dtos::NewsResponseDto,
            ApiResponse<news_dtos::NewsResponseDto>,
            ApiResponse<Vec<news_dtos::NewsResponseDto>>,
            // Documents
            documents_dtos::CreateDocumentDto,
            documents_dtos::UpdateDocumentDto,
            documents_dtos::DocumentResponseDto,
            ApiResponse<documents_dtos::DocumentResponseDto>,
            ApiResponse<Vec<documents_dtos::DocumentResponseDto>>,
            // Stations
            stations_dtos::CreateStationDto,
            stations_dtos::UpdateStationDto,
            stations_dtos::StationResponseDto,
            ApiResponse<stations_dtos::StationResponseDto>,
            ApiResponse<Vec<stations_dtos::StationResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Login and token verification"),
        (name = "news", description = "News articles with optional images"),
        (name = "documents", description = "Published documents and their files"),
        (name = "stations", description = "Weather and monitoring stations"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "BQ Verde API",
        version = "0.1.0",
        description = "News, documents and monitoring stations",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_entity_routes_and_bearer_scheme() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Overridden".to_string(),
        }
        .modify(&mut doc);

        for path in ["/api/news/{id}", "/api/documents", "/api/stations/{id}", "/api/auth/login"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert_eq!(doc.info.title, "Custom");
    }
}
