// Public API - what other modules can use
pub use handlers::{create_series, get_series, list_series, rescore_series, update_series};
pub use recorder::{apply_result, RecordedResult, ResultTransition, SeriesResult};
pub use service::SeriesService;
pub(crate) use service::validate_matchup;

// Internal modules
mod handlers;
pub mod models;
mod recorder;
pub mod repository;
mod service;
pub mod types;
