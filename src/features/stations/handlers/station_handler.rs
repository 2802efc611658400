use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::stations::dtos::{CreateStationDto, StationResponseDto, UpdateStationDto};
use crate::features::stations::services::StationService;
use crate::shared::types::{ApiResponse, Meta};

/// Register a station
#[utoipa::path(
    post,
    path = "/api/stations",
    request_body = CreateStationDto,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "stations",
    security(("bearer_auth" = []))
)]
pub async fn create_station(
    _user: AuthenticatedUser,
    State(service): State<Arc<StationService>>,
    AppJson(dto): AppJson<CreateStationDto>,
) -> Result<(StatusCode, Json<ApiResponse<StationResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let station = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(station),
            Some("Station created successfully".to_string()),
            None,
        )),
    ))
}

/// List stations ordered by name
#[utoipa::path(
    get,
    path = "/api/stations",
    responses(
        (status = 200, description = "List of stations", body = ApiResponse<Vec<StationResponseDto>>)
    ),
    tag = "stations"
)]
pub async fn list_stations(
    State(service): State<Arc<StationService>>,
) -> Result<Json<ApiResponse<Vec<StationResponseDto>>>> {
    let items = service.list().await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    params(
        ("id" = String, Path, description = "Station ID")
    ),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationResponseDto>),
        (status = 400, description = "Invalid station ID"),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(service): State<Arc<StationService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StationResponseDto>>> {
    let station = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(station), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/stations/{id}",
    params(
        ("id" = String, Path, description = "Station ID")
    ),
    request_body = UpdateStationDto,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationResponseDto>),
        (status = 400, description = "Validation error, invalid ID or nothing to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Station not found")
    ),
    tag = "stations",
    security(("bearer_auth" = []))
)]
pub async fn update_station(
    _user: AuthenticatedUser,
    State(service): State<Arc<StationService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateStationDto>,
) -> Result<Json<ApiResponse<StationResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let station = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(station),
        Some("Station updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/stations/{id}",
    params(
        ("id" = String, Path, description = "Station ID")
    ),
    responses(
        (status = 204, description = "Station deleted"),
        (status = 400, description = "Invalid station ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Station not found")
    ),
    tag = "stations",
    security(("bearer_auth" = []))
)]
pub async fn delete_station(
    _user: AuthenticatedUser,
    State(service): State<Arc<StationService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
