use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted range for every configurable point value
pub const POINT_VALUES: RangeInclusive<i32> = 0..=1000;

/// Per-season pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfigModel {
    pub season: String,
    pub allow_late_predictions: bool,
    pub points_for_correct_winner: i32,
    pub points_for_correct_games: i32,
    pub points_for_finalist_team: i32,
    pub points_for_champion: i32,
    pub points_for_champion_games: i32,
    pub updated_at: Option<DateTime<Utc>>, // None until an admin saves the season
}

impl PoolConfigModel {
    /// Settings used for a season nobody has configured
    pub fn defaults(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            allow_late_predictions: false,
            points_for_correct_winner: 1,
            points_for_correct_games: 2,
            points_for_finalist_team: 1,
            points_for_champion: 1,
            points_for_champion_games: 2,
            updated_at: None,
        }
    }
}
