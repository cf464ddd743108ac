use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::PoolConfigModel;

#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

/// Pool configuration as exchanged with the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfigPayload {
    pub season: String,
    pub allow_late_predictions: bool,
    pub points_for_correct_winner: i32,
    pub points_for_correct_games: i32,
    pub points_for_finalist_team: i32,
    pub points_for_champion: i32,
    pub points_for_champion_games: i32,
    #[serde(default, skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PoolConfigModel> for PoolConfigPayload {
    fn from(config: PoolConfigModel) -> Self {
        Self {
            season: config.season,
            allow_late_predictions: config.allow_late_predictions,
            points_for_correct_winner: config.points_for_correct_winner,
            points_for_correct_games: config.points_for_correct_games,
            points_for_finalist_team: config.points_for_finalist_team,
            points_for_champion: config.points_for_champion,
            points_for_champion_games: config.points_for_champion_games,
            updated_at: config.updated_at,
        }
    }
}
