use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::services::TokenService;

/// Resolves a bearer token to the account it was issued for
pub struct JwtValidator {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl JwtValidator {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.tokens.verify(token)?;

        // The account must still exist
        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

        Ok(user.into())
    }
}
