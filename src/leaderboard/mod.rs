//! Leaderboard Aggregator.
//!
//! Totals are computed at read time from stored prediction points; nothing
//! here is persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::models::UserModel;
use crate::predictions::models::PredictionModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub name: String,
    pub total_points: i64,
}

/// Sums each user's series prediction points and ranks them.
///
/// Every user gets an entry, including those without predictions. Order is
/// total descending, then user id ascending.
pub fn rank(users: &[UserModel], predictions: &[PredictionModel]) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<i64, i64> = HashMap::new();
    for prediction in predictions {
        *totals.entry(prediction.user_id).or_default() += i64::from(prediction.points);
    }

    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|user| LeaderboardEntry {
            user_id: user.id,
            name: user.name.clone(),
            total_points: totals.get(&user.id).copied().unwrap_or_default(),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(a.user_id.cmp(&b.user_id))
    });
    entries
}
