use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    InitAdminResponseDto, LoginRequestDto, TokenResponseDto, VerifyResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Incorrect credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<TokenResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(token), None, None)))
}

/// Check that the bearer token is valid and return its account
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<VerifyResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<VerifyResponseDto>>> {
    Ok(Json(ApiResponse::success(
        Some(service.verify(user)),
        None,
        None,
    )))
}

/// Create the configured admin account (development bootstrap)
#[utoipa::path(
    post,
    path = "/api/auth/init-admin",
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<InitAdminResponseDto>),
        (status = 200, description = "Admin already exists", body = ApiResponse<InitAdminResponseDto>)
    ),
    tag = "auth"
)]
pub async fn init_admin(
    State(service): State<Arc<AuthService>>,
) -> Result<(StatusCode, Json<ApiResponse<InitAdminResponseDto>>)> {
    let response = service.init_admin().await?;
    let status = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message = response.message.clone();
    Ok((
        status,
        Json(ApiResponse::success(Some(response), Some(message), None)),
    ))
}
