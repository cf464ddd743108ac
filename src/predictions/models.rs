use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::series::models::SeriesModel;

/// A best-of-seven series lasts between four and seven games
pub const SERIES_LENGTH: RangeInclusive<i32> = 4..=7;

/// Database model for the predictions table; unique per (user, series)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionModel {
    pub id: i64,
    pub user_id: i64,
    pub series_id: i64,
    pub predicted_winner_id: i64,
    pub predicted_games: i32,
    pub points: i32, // Written by scoring or admin override only
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pick submitted for a series
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPick {
    pub user_id: i64,
    pub series_id: i64,
    pub predicted_winner_id: i64,
    pub predicted_games: i32,
}

/// Where a user's prediction for one series stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PredictionState {
    NoPrediction,
    Predicted,
    Locked,
}

impl PredictionState {
    pub fn of(prediction: Option<&PredictionModel>, series: &SeriesModel) -> Self {
        match (prediction, series.completed) {
            (None, _) => PredictionState::NoPrediction,
            (Some(_), false) => PredictionState::Predicted,
            (Some(_), true) => PredictionState::Locked,
        }
    }
}
