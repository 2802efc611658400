use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponseDto {
    /// HS256 JWT access token
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Response DTO for token verification
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponseDto {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub message: String,
}

impl From<AuthenticatedUser> for VerifyResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            message: "Token is valid".to_string(),
        }
    }
}

/// Response DTO for the admin bootstrap endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitAdminResponseDto {
    /// Whether the account was created by this call
    pub created: bool,
    pub message: String,
}
