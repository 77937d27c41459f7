use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::services::TokenService;
use crate::features::auth::models::{User, UserRole};

/// Registration, login and profile lookup.
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check email uniqueness: {:?}", e);
                AppError::Database(e)
            })?;

        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "An account with email '{}' already exists",
                dto.email
            )));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, mobile)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, first_name, last_name, mobile,
                      role, is_active, created_at, updated_at
            "#,
        )
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.mobile)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("User registered: id={}, email={}", user.id, user.email);

        let token = self.tokens.issue_token(&user)?;
        Ok(AuthResponseDto {
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, mobile,
                   role, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user for login: {:?}", e);
            AppError::Database(e)
        })?;

        // Same message for unknown email and wrong password
        let user = user
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash) {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "This account has been deactivated".to_string(),
            ));
        }

        let token = self.tokens.issue_token(&user)?;
        Ok(AuthResponseDto {
            token,
            user: user.into(),
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<AuthUserDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, mobile,
                   role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load profile: {:?}", e);
            AppError::Database(e)
        })?;

        user.map(|u| u.into())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Current live role of a user, or None when missing/deactivated.
    /// Used by `RoleVerifier` to refresh token-cached roles.
    pub async fn current_role(&self, user_id: Uuid) -> Result<Option<UserRole>> {
        let role = sqlx::query_scalar::<_, UserRole>(
            "SELECT role FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load current role: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(role)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AppError::Internal("Failed to process password".to_string())
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
