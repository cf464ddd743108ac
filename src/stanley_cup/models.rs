use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database model for Stanley Cup predictions; unique per (user, season)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupPredictionModel {
    pub id: i64,
    pub user_id: i64,
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winner_team_id: i64, // One of the two finalists
    pub predicted_games: i32,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Finalist and champion picks submitted by a user
#[derive(Debug, Clone, PartialEq)]
pub struct CupPick {
    pub user_id: i64,
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winner_team_id: i64,
    pub predicted_games: i32,
}

/// The actual final of a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupResultModel {
    pub season: String,
    pub east_team_id: i64,
    pub west_team_id: i64,
    pub winning_team_id: i64,
    pub games_played: i32,
    pub recorded_at: DateTime<Utc>,
}
