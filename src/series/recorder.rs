//! Series Result Recorder.
//!
//! Validates a reported game tally against the best-of-seven invariants and
//! derives the completed flag, winner and end date. Pure: persistence and the
//! scoring cascade live in `SeriesService`.

use chrono::{DateTime, Utc};

use super::models::{SeriesModel, WINS_TO_CLINCH};
use crate::shared::AppError;

/// A reported tally for a series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    pub home_team_wins: i32,
    pub away_team_wins: i32,
    pub games_played: i32,
    pub completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// How the series state moved with an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTransition {
    /// Not final before or after
    InProgress,
    /// Became final with this update
    Completed,
    /// Was final and still is, possibly with a corrected tally
    Corrected,
    /// Was final and no longer is
    Reopened,
}

impl ResultTransition {
    /// Whether predictions on the series need (re)scoring
    pub fn needs_scoring(self) -> bool {
        matches!(self, ResultTransition::Completed | ResultTransition::Corrected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedResult {
    pub series: SeriesModel,
    pub transition: ResultTransition,
}

/// Applies a reported tally to the current series state
pub fn apply_result(
    current: &SeriesModel,
    result: &SeriesResult,
    now: DateTime<Utc>,
) -> Result<RecordedResult, AppError> {
    let home = result.home_team_wins;
    let away = result.away_team_wins;

    if home < 0 || away < 0 || result.games_played < 0 {
        return Err(AppError::validation("Win and game counts cannot be negative"));
    }
    if home > WINS_TO_CLINCH || away > WINS_TO_CLINCH {
        return Err(AppError::validation(format!(
            "A team cannot win more than {WINS_TO_CLINCH} games in a series"
        )));
    }
    if home + away != result.games_played {
        return Err(AppError::validation(format!(
            "Games played ({}) must equal home wins ({home}) plus away wins ({away})",
            result.games_played
        )));
    }
    if home == WINS_TO_CLINCH && away == WINS_TO_CLINCH {
        return Err(AppError::validation("Only one team can win the series"));
    }

    let winning_team_id = if home == WINS_TO_CLINCH {
        Some(current.home_team_id)
    } else if away == WINS_TO_CLINCH {
        Some(current.away_team_id)
    } else {
        None
    };

    // A derived winner always completes the series; the flag alone cannot
    let completed = winning_team_id.is_some() || result.completed;
    if completed && winning_team_id.is_none() {
        return Err(AppError::validation(format!(
            "A series can only be completed once a team has {WINS_TO_CLINCH} wins"
        )));
    }

    let start_date = result.start_date.or(current.start_date);
    let end_date = if completed {
        Some(result.end_date.or(current.end_date).unwrap_or(now))
    } else {
        None
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(AppError::validation("End date cannot be before start date"));
        }
    }

    let transition = match (current.completed, completed) {
        (false, false) => ResultTransition::InProgress,
        (false, true) => ResultTransition::Completed,
        (true, true) => ResultTransition::Corrected,
        (true, false) => ResultTransition::Reopened,
    };

    Ok(RecordedResult {
        series: SeriesModel {
            home_team_wins: home,
            away_team_wins: away,
            games_played: result.games_played,
            winning_team_id,
            completed,
            start_date,
            end_date,
            ..current.clone()
        },
        transition,
    })
}
