//! Role-based authorization guards.
//!
//! Role hierarchy (from highest to lowest):
//! - admin: full back-office access, including bulk operations and order
//!   status management
//! - moderator: catalog and order management
//! - customer: storefront operations on their own resources
//!
//! The extractor guards check the role cached in the token. Admin route
//! trees additionally run `verify_admin_middleware`, which re-checks the
//! live role through `RoleVerifier` so demotions take effect without
//! waiting for token expiry.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::RoleVerifier;

/// Guard for handlers that require the admin role (as cached in the token).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Guard for handlers that require moderator-level access (moderator or
/// admin, as cached in the token).
pub struct RequireModerator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireModerator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.has_moderator_access() {
            return Err(AppError::Forbidden(
                "Moderator access required".to_string(),
            ));
        }

        Ok(RequireModerator(user.clone()))
    }
}

/// Route-layer middleware for the admin tree: confirms the live role still
/// grants moderator-level access before the token-role guards run.
pub async fn verify_admin_middleware(
    State(verifier): State<Arc<RoleVerifier>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    verifier.require_moderator(&user).await?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin_user, create_customer_user, with_admin_auth};
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use uuid::Uuid;

    fn parts_with(user: AuthenticatedUser) -> Parts {
        let mut req = axum::http::Request::builder().body(()).unwrap();
        req.extensions_mut().insert(user);
        req.into_parts().0
    }

    #[tokio::test]
    async fn admin_guard_accepts_admin() {
        let mut parts = parts_with(create_admin_user());
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn admin_guard_rejects_customer() {
        let mut parts = parts_with(create_customer_user(Uuid::from_u128(1)));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn moderator_guard_accepts_admin() {
        let mut parts = parts_with(create_admin_user());
        assert!(RequireModerator::from_request_parts(&mut parts, &())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn guard_without_authentication_is_unauthorized() {
        let mut parts = axum::http::Request::builder()
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn injected_admin_passes_guarded_route() {
        async fn guarded(RequireAdmin(user): RequireAdmin) -> String {
            user.email
        }
        let app = with_admin_auth(Router::new().route("/guarded", get(guarded)));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/guarded").await;
        response.assert_status_ok();
        response.assert_text("admin@example.com");
    }
}
