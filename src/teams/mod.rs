// Public API - what other modules can use
pub use handlers::{create_team, get_team, list_teams, seed_teams, update_team};
pub use service::TeamService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod seed;
mod service;
pub mod types;
