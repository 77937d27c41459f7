pub mod auth_service;
pub mod role_verifier;
pub mod token_service;

pub use auth_service::AuthService;
pub use role_verifier::RoleVerifier;
pub use token_service::TokenService;
