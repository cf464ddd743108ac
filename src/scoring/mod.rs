// Public API - what other modules can use
pub use rules::{
    score_cup_prediction, score_series_prediction, CupPointTable, SeriesOutcome, SeriesPointTable,
};
pub use service::{ScoringService, ScoringSummary};

// Internal modules
mod rules;
mod service;
