use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{PredictionModel, PredictionState};
use crate::leaderboard::LeaderboardEntry;

/// Request payload for submitting a series pick
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPredictionRequest {
    pub series_id: i64,
    pub predicted_winner_id: i64,
    pub predicted_games: i32,
    pub user_id: Option<i64>, // Admins may submit on behalf of a user
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverridePointsRequest {
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub id: i64,
    pub user_id: i64,
    pub series_id: i64,
    pub predicted_winner_id: i64,
    pub predicted_games: i32,
    pub points: i32,
    pub state: PredictionState,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn new(prediction: PredictionModel, state: PredictionState) -> Self {
        Self {
            id: prediction.id,
            user_id: prediction.user_id,
            series_id: prediction.series_id,
            predicted_winner_id: prediction.predicted_winner_id,
            predicted_games: prediction.predicted_games,
            points: prediction.points,
            state,
            locked: state == PredictionState::Locked,
            created_at: prediction.created_at,
            updated_at: prediction.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}
