#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::{ROLE_ADMIN, ROLE_CUSTOMER};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::nil(),
        email: "admin@example.com".to_string(),
        role: ROLE_ADMIN.to_string(),
    }
}

#[cfg(test)]
pub fn create_customer_user(user_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        email: "customer@example.com".to_string(),
        role: ROLE_CUSTOMER.to_string(),
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}
