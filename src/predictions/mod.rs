// Public API - what other modules can use
pub use handlers::{
    leaderboard, my_predictions, override_points, series_predictions, submit_prediction,
};
pub use service::PredictionService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
