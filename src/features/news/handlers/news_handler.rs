use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::news::dtos::{CreateNewsDto, ListNewsQuery, NewsResponseDto, UpdateNewsDto};
use crate::features::news::services::NewsService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a news article
#[utoipa::path(
    post,
    path = "/api/news",
    request_body = CreateNewsDto,
    responses(
        (status = 201, description = "News created", body = ApiResponse<NewsResponseDto>),
        (status = 400, description = "Validation error or malformed image"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn create_news(
    _user: AuthenticatedUser,
    State(service): State<Arc<NewsService>>,
    AppJson(dto): AppJson<CreateNewsDto>,
) -> Result<(StatusCode, Json<ApiResponse<NewsResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let news = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(news),
            Some("News created successfully".to_string()),
            None,
        )),
    ))
}

/// List news articles, newest first
#[utoipa::path(
    get,
    path = "/api/news",
    params(ListNewsQuery),
    responses(
        (status = 200, description = "List of news", body = ApiResponse<Vec<NewsResponseDto>>)
    ),
    tag = "news"
)]
pub async fn list_news(
    State(service): State<Arc<NewsService>>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<ApiResponse<Vec<NewsResponseDto>>>> {
    let items = service.list(query.category_filter()).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

/// Get a news article by id
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(
        ("id" = String, Path, description = "News ID")
    ),
    responses(
        (status = 200, description = "News details", body = ApiResponse<NewsResponseDto>),
        (status = 400, description = "Invalid news ID"),
        (status = 404, description = "News not found")
    ),
    tag = "news"
)]
pub async fn get_news(
    State(service): State<Arc<NewsService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NewsResponseDto>>> {
    let news = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(news), None, None)))
}

/// Update a news article
#[utoipa::path(
    put,
    path = "/api/news/{id}",
    params(
        ("id" = String, Path, description = "News ID")
    ),
    request_body = UpdateNewsDto,
    responses(
        (status = 200, description = "News updated", body = ApiResponse<NewsResponseDto>),
        (status = 400, description = "Validation error, invalid ID or nothing to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "News not found")
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn update_news(
    _user: AuthenticatedUser,
    State(service): State<Arc<NewsService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateNewsDto>,
) -> Result<Json<ApiResponse<NewsResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let news = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(news),
        Some("News updated successfully".to_string()),
        None,
    )))
}

/// Delete a news article and its image
#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    params(
        ("id" = String, Path, description = "News ID")
    ),
    responses(
        (status = 204, description = "News deleted"),
        (status = 400, description = "Invalid news ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "News not found")
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn delete_news(
    _user: AuthenticatedUser,
    State(service): State<Arc<NewsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
