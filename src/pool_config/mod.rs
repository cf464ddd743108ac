// Public API - what other modules can use
pub use handlers::{get_config, update_config};
pub use models::PoolConfigModel;
pub use service::PoolConfigService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
