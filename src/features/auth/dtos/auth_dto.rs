use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::{User, UserRole};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: Option<String>,
    pub role: UserRole,
}

impl From<User> for AuthUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            mobile: u.mobile,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: AuthUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    #[test]
    fn well_formed_registration_passes_validation() {
        let dto = RegisterRequestDto {
            email: SafeEmail().fake(),
            password: "longenoughpassword".to_string(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            mobile: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn short_password_fails_validation() {
        let dto = RegisterRequestDto {
            email: SafeEmail().fake(),
            password: "short".to_string(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            mobile: None,
        };
        assert!(dto.validate().is_err());
    }
}
