// Public API - what other modules can use
pub use handlers::{get_cup_results, my_cup_prediction, record_cup_results, submit_cup_prediction};
pub use service::CupService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
