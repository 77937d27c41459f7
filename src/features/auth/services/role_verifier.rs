use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::UserRole;
use crate::features::auth::services::AuthService;

/// Session-refresh policy for token-cached roles.
///
/// Access tokens embed the role at issuance, so a role change would
/// otherwise go unnoticed until the token expires. Privileged routes call
/// into this verifier, which re-queries the live role at most once per
/// `refresh_interval` per user. A demoted or deactivated account loses
/// admin access within one interval even while its old token is valid.
pub struct RoleVerifier {
    auth: Arc<AuthService>,
    refresh_interval: Duration,
    cache: RwLock<HashMap<Uuid, CachedRole>>,
}

#[derive(Clone, Copy)]
struct CachedRole {
    role: Option<UserRole>,
    fetched_at: Instant,
}

impl RoleVerifier {
    pub fn new(auth: Arc<AuthService>, refresh_interval: Duration) -> Self {
        Self {
            auth,
            refresh_interval,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The user's live role, served from cache within the refresh interval.
    /// `None` means the account is gone or deactivated.
    pub async fn live_role(&self, user_id: Uuid) -> Result<Option<UserRole>> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&user_id) {
                if entry.fetched_at.elapsed() < self.refresh_interval {
                    return Ok(entry.role);
                }
            }
        }

        let role = self.auth.current_role(user_id).await?;
        let mut cache = self.cache.write().await;
        cache.insert(
            user_id,
            CachedRole {
                role,
                fetched_at: Instant::now(),
            },
        );
        Ok(role)
    }

    /// Reject unless the user's live role grants moderator-level access.
    pub async fn require_moderator(&self, user: &AuthenticatedUser) -> Result<()> {
        match self.live_role(user.user_id).await? {
            Some(UserRole::Admin) | Some(UserRole::Moderator) => Ok(()),
            Some(_) => Err(AppError::Forbidden(
                "Moderator access required".to_string(),
            )),
            None => Err(AppError::Unauthorized(
                "Account is no longer active".to_string(),
            )),
        }
    }

    /// Reject unless the user's live role is admin.
    pub async fn require_admin(&self, user: &AuthenticatedUser) -> Result<()> {
        match self.live_role(user.user_id).await? {
            Some(UserRole::Admin) => Ok(()),
            Some(_) => Err(AppError::Forbidden("Admin access required".to_string())),
            None => Err(AppError::Unauthorized(
                "Account is no longer active".to_string(),
            )),
        }
    }
}
