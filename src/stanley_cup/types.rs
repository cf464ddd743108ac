use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{CupPredictionModel, CupResultModel};
use crate::scoring::ScoringSummary;

/// Request payload for finalist and champion picks
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CupPredictionRequest {
    pub season: Option<String>,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winner_team_id: i64,
    pub predicted_games: i32,
}

/// Request payload for the actual final
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CupResultRequest {
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winning_team_id: i64,
    pub games_played: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CupPredictionResponse {
    pub id: i64,
    pub user_id: i64,
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winner_team_id: i64,
    pub predicted_games: i32,
    pub points: i32,
    pub locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl CupPredictionResponse {
    pub fn new(prediction: CupPredictionModel, locked: bool) -> Self {
        Self {
            id: prediction.id,
            user_id: prediction.user_id,
            season: prediction.season,
            east_team_id: prediction.east_team_id,
            west_team_id: prediction.west_team_id,
            winner_team_id: prediction.winner_team_id,
            predicted_games: prediction.predicted_games,
            points: prediction.points,
            locked,
            updated_at: prediction.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CupResultResponse {
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winning_team_id: i64,
    pub games_played: i32,
    pub recorded_at: DateTime<Utc>,
}

impl From<CupResultModel> for CupResultResponse {
    fn from(result: CupResultModel) -> Self {
        Self {
            season: result.season,
            east_team_id: result.east_team_id,
            west_team_id: result.west_team_id,
            winning_team_id: result.winning_team_id,
            games_played: result.games_played,
            recorded_at: result.recorded_at,
        }
    }
}

/// Stored result plus what scoring touched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CupResultSummary {
    pub result: CupResultResponse,
    pub summary: ScoringSummary,
}

#[derive(Debug, Deserialize)]
pub struct CupSeasonQuery {
    pub season: Option<String>,
}
