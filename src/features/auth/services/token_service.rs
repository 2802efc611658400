use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;

/// A signed access token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and verifies HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
    leeway_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl.as_secs() as i64,
            leeway_secs: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue(&self, username: &str) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs,
        })
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Could not validate credentials".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_auth_config;
    use std::time::Duration;

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(&test_auth_config());

        let issued = service.issue("admin").unwrap();
        let claims = service.verify(&issued.access_token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(issued.expires_in, 30 * 60);
        assert_eq!(claims.exp - claims.iat, issued.expires_in);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let service = TokenService::new(&test_auth_config());
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret-that-is-long-enough-to-use".to_string(),
            ..test_auth_config()
        });

        let issued = other.issue("admin").unwrap();

        assert!(matches!(
            service.verify(&issued.access_token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let config = AuthConfig {
            token_ttl: Duration::from_secs(0),
            jwt_leeway: Duration::from_secs(0),
            ..test_auth_config()
        };
        let service = TokenService::new(&config);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let service = TokenService::new(&test_auth_config());
        assert!(service.verify("not.a.jwt").is_err());
    }
}
