// Library crate for the playoff pool service
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod leaderboard;
pub mod notify;
pub mod pool_config;
pub mod predictions;
pub mod rounds;
pub mod routes;
pub mod scoring;
pub mod series;
pub mod shared;
pub mod stanley_cup;
pub mod teams;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use routes::app_router;
pub use shared::{AppError, AppState};
