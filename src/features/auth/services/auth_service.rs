use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::config::AdminSeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    InitAdminResponseDto, LoginRequestDto, TokenResponseDto, VerifyResponseDto,
};
use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::services::{hash_password, verify_password, TokenService};
use crate::shared::constants::TOKEN_TYPE_BEARER;

fn incorrect_credentials() -> AppError {
    AppError::Unauthorized("Incorrect credentials".to_string())
}

/// Service for login, token verification and the admin bootstrap
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    admin: AdminSeedConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        admin: AdminSeedConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            admin,
        }
    }

    /// Exchange email and password for an access token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<TokenResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(incorrect_credentials)?;

        if !verify_password(dto.password, user.hashed_password.clone()).await? {
            tracing::info!("Failed login for user {}", user.username);
            return Err(incorrect_credentials());
        }

        let issued = self.tokens.issue(&user.username)?;
        tracing::info!("User logged in: {}", user.username);

        Ok(TokenResponseDto {
            access_token: issued.access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: issued.expires_in,
        })
    }

    pub fn verify(&self, user: AuthenticatedUser) -> VerifyResponseDto {
        user.into()
    }

    /// Create the configured admin account unless the username is taken
    pub async fn init_admin(&self) -> Result<InitAdminResponseDto> {
        if self
            .users
            .find_by_username(&self.admin.username)
            .await?
            .is_some()
        {
            return Ok(InitAdminResponseDto {
                created: false,
                message: "Admin user already exists".to_string(),
            });
        }

        let hashed_password = hash_password(self.admin.password.clone()).await?;
        let user = User {
            id: Uuid::now_v7(),
            username: self.admin.username.clone(),
            email: self.admin.email.clone(),
            hashed_password,
            is_admin: true,
            created_at: Utc::now(),
        };

        let created = self.users.insert(&user).await?;
        tracing::warn!("Bootstrap admin account created: {}", created.username);

        Ok(InitAdminResponseDto {
            created: true,
            message: format!("Admin user created (email: {})", created.email),
        })
    }
}
