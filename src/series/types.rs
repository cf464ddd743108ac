use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::SeriesModel;
use super::recorder::SeriesResult;

/// Request payload for scheduling a series
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeriesRequest {
    pub round_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub start_date: Option<DateTime<Utc>>,
}

/// Request payload for reporting a series tally
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSeriesRequest {
    pub home_team_wins: i32,
    pub away_team_wins: i32,
    pub games_played: i32,
    #[serde(default)]
    pub completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<UpdateSeriesRequest> for SeriesResult {
    fn from(request: UpdateSeriesRequest) -> Self {
        Self {
            home_team_wins: request.home_team_wins,
            away_team_wins: request.away_team_wins,
            games_played: request.games_played,
            completed: request.completed,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQuery {
    pub round_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub id: i64,
    pub round_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_team_wins: i32,
    pub away_team_wins: i32,
    pub games_played: i32,
    pub winning_team_id: Option<i64>,
    pub completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<SeriesModel> for SeriesResponse {
    fn from(series: SeriesModel) -> Self {
        Self {
            id: series.id,
            round_id: series.round_id,
            home_team_id: series.home_team_id,
            away_team_id: series.away_team_id,
            home_team_wins: series.home_team_wins,
            away_team_wins: series.away_team_wins,
            games_played: series.games_played,
            winning_team_id: series.winning_team_id,
            completed: series.completed,
            start_date: series.start_date,
            end_date: series.end_date,
        }
    }
}
