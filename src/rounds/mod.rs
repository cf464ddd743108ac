// Public API - what other modules can use
pub use handlers::{create_round, create_round_with_matchups, list_rounds, update_round};
pub use service::RoundService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
