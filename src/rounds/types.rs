use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::RoundModel;
use crate::series::types::SeriesResponse;

/// Request payload for creating or replacing a round
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRequest {
    pub name: String,
    pub number: i32,
    pub season: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupRequest {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub start_date: Option<DateTime<Utc>>,
}

/// Request payload for creating a round together with its series
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundWithMatchupsRequest {
    pub name: String,
    pub number: i32,
    pub season: String,
    pub matchups: Vec<MatchupRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RoundQuery {
    pub season: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    pub id: i64,
    pub name: String,
    pub number: i32,
    pub season: String,
    pub is_active: bool,
}

impl From<RoundModel> for RoundResponse {
    fn from(round: RoundModel) -> Self {
        Self {
            id: round.id,
            name: round.name,
            number: round.number,
            season: round.season,
            is_active: round.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundWithSeriesResponse {
    pub round: RoundResponse,
    pub series: Vec<SeriesResponse>,
}
