use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Playoff rounds run from the first round to the final
pub const ROUND_NUMBERS: RangeInclusive<i32> = 1..=4;

/// Database model for the rounds table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundModel {
    pub id: i64,
    pub name: String,
    pub number: i32,
    pub season: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewRound {
    pub name: String,
    pub number: i32,
    pub season: String,
    pub is_active: bool,
}
