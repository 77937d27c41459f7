use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::auth::models::User;

/// Issues and validates HS256 access tokens.
///
/// The role is embedded in the token at issuance, so a role change only
/// takes effect on a fresh token; admin routes additionally re-verify the
/// live role through `RoleVerifier`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {}", e);
            AppError::Internal("Failed to issue token".to_string())
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(AuthenticatedUser {
            user_id: token_data.claims.sub,
            email: token_data.claims.email,
            role: token_data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::models::UserRole;
    use std::time::Duration;
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl: Duration::from_secs(3600),
            role_refresh_interval: Duration::from_secs(60),
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::from_u128(1),
            email: "shopper@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Test".to_string(),
            last_name: "Shopper".to_string(),
            mobile: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let service = TokenService::new(&config());
        let token = service.issue_token(&user(UserRole::Customer)).unwrap();

        let authenticated = service.validate_token(&token).unwrap();
        assert_eq!(authenticated.user_id, Uuid::from_u128(1));
        assert_eq!(authenticated.role, "customer");
        assert!(!authenticated.is_admin());
    }

    #[test]
    fn role_is_cached_in_token_at_issuance() {
        let service = TokenService::new(&config());
        let token = service.issue_token(&user(UserRole::Admin)).unwrap();

        let authenticated = service.validate_token(&token).unwrap();
        assert!(authenticated.is_admin());
        assert!(authenticated.has_moderator_access());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = TokenService::new(&config());
        assert!(matches!(
            service.validate_token("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret-another-secret-12".to_string(),
            token_ttl: Duration::from_secs(3600),
            role_refresh_interval: Duration::from_secs(60),
        });
        let token = issuer.issue_token(&user(UserRole::Customer)).unwrap();

        let service = TokenService::new(&config());
        assert!(service.validate_token(&token).is_err());
    }
}
