use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wins needed to take a best-of-seven series
pub const WINS_TO_CLINCH: i32 = 4;

/// Database model for the series table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesModel {
    pub id: i64,
    pub round_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_team_wins: i32,
    pub away_team_wins: i32,
    pub games_played: i32,
    pub winning_team_id: Option<i64>, // Set only once a team reaches 4 wins
    pub completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>, // Set only while completed
}

impl SeriesModel {
    /// Whether the team plays in this series
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn total_games(&self) -> i32 {
        self.home_team_wins + self.away_team_wins
    }

    /// Whether the first game has been reached at `now`
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_date.is_some_and(|start| start <= now)
    }
}

/// Fields supplied when scheduling a series
#[derive(Debug, Clone)]
pub struct NewSeries {
    pub round_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub start_date: Option<DateTime<Utc>>,
}
