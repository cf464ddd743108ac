// Public API - what other modules can use
pub use handlers::{current_user, list_users, request_magic_link, verify_magic_link};
pub use middleware::{jwt_auth, require_admin};
pub use service::AuthService;
pub use token::TokenConfig;
pub use types::AuthClaims;

// Internal modules
mod generators;
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
mod service;
mod token;
pub mod types;
