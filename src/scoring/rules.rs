//! Point rules for series and Stanley Cup predictions.
//!
//! Everything here is a pure function of plain records; writing the points
//! back is `ScoringService`'s job.

use crate::pool_config::PoolConfigModel;
use crate::predictions::models::PredictionModel;
use crate::series::models::SeriesModel;
use crate::shared::AppError;
use crate::stanley_cup::models::{CupPredictionModel, CupResultModel};

/// Point values for a regular series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPointTable {
    pub correct_winner: i32,
    pub correct_games: i32, // Only on top of a correct winner
}

impl Default for SeriesPointTable {
    fn default() -> Self {
        Self {
            correct_winner: 1,
            correct_games: 2,
        }
    }
}

impl From<&PoolConfigModel> for SeriesPointTable {
    fn from(config: &PoolConfigModel) -> Self {
        Self {
            correct_winner: config.points_for_correct_winner,
            correct_games: config.points_for_correct_games,
        }
    }
}

/// Final result of a series, only obtainable from a completed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOutcome {
    pub series_id: i64,
    pub winning_team_id: i64,
    pub total_games: i32,
}

impl TryFrom<&SeriesModel> for SeriesOutcome {
    type Error = AppError;

    fn try_from(series: &SeriesModel) -> Result<Self, Self::Error> {
        match (series.completed, series.winning_team_id) {
            (true, Some(winning_team_id)) => Ok(Self {
                series_id: series.id,
                winning_team_id,
                total_games: series.total_games(),
            }),
            _ => Err(AppError::Precondition(format!(
                "Series {} is not completed with a winner",
                series.id
            ))),
        }
    }
}

/// Points earned by one series prediction
pub fn score_series_prediction(
    prediction: &PredictionModel,
    outcome: &SeriesOutcome,
    table: &SeriesPointTable,
) -> i32 {
    if prediction.predicted_winner_id != outcome.winning_team_id {
        return 0;
    }
    if prediction.predicted_games == outcome.total_games {
        table.correct_winner.saturating_add(table.correct_games)
    } else {
        table.correct_winner
    }
}

/// Point values for the Stanley Cup final
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CupPointTable {
    pub east_finalist: i32,
    pub west_finalist: i32,
    pub champion: i32,
    pub champion_games: i32, // Only on top of a correct champion
}

impl Default for CupPointTable {
    fn default() -> Self {
        Self {
            east_finalist: 2,
            west_finalist: 2,
            champion: 6,
            champion_games: 3,
        }
    }
}

/// Points earned by one Stanley Cup prediction
pub fn score_cup_prediction(
    prediction: &CupPredictionModel,
    result: &CupResultModel,
    table: &CupPointTable,
) -> i32 {
    let mut points: i32 = 0;
    if prediction.east_team_id == result.east_team_id {
        points = points.saturating_add(table.east_finalist);
    }
    if prediction.west_team_id == result.west_team_id {
        points = points.saturating_add(table.west_finalist);
    }
    if prediction.winner_team_id == result.winning_team_id {
        points = points.saturating_add(table.champion);
        if prediction.predicted_games == result.games_played {
            points = points.saturating_add(table.champion_games);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    const DAL: i64 = 1;
    const COL: i64 = 2;
    const CAR: i64 = 3;
    const TOR: i64 = 4;

    fn finished_series() -> SeriesModel {
        SeriesModel {
            id: 7,
            round_id: 1,
            home_team_id: DAL,
            away_team_id: COL,
            home_team_wins: 4,
            away_team_wins: 2,
            games_played: 6,
            winning_team_id: Some(DAL),
            completed: true,
            start_date: None,
            end_date: Some(Utc::now()),
        }
    }

    fn prediction(winner: i64, games: i32) -> PredictionModel {
        PredictionModel {
            id: 1,
            user_id: 1,
            series_id: 7,
            predicted_winner_id: winner,
            predicted_games: games,
            points: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cup_prediction(east: i64, west: i64, winner: i64, games: i32) -> CupPredictionModel {
        CupPredictionModel {
            id: 1,
            user_id: 1,
            season: "2025".to_string(),
            east_team_id: east,
            west_team_id: west,
            winner_team_id: winner,
            predicted_games: games,
            points: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cup_result() -> CupResultModel {
        CupResultModel {
            season: "2025".to_string(),
            east_team_id: CAR,
            west_team_id: DAL,
            winning_team_id: DAL,
            games_played: 6,
            recorded_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(DAL, 6, 3)]
    #[case(DAL, 7, 1)]
    #[case(COL, 6, 0)]
    #[case(COL, 7, 0)]
    fn test_series_points_with_default_table(
        #[case] winner: i64,
        #[case] games: i32,
        #[case] expected: i32,
    ) {
        let outcome = SeriesOutcome::try_from(&finished_series()).unwrap();
        let points =
            score_series_prediction(&prediction(winner, games), &outcome, &SeriesPointTable::default());
        assert_eq!(points, expected);
    }

    #[rstest]
    #[case(DAL, 6, 8)]
    #[case(DAL, 5, 3)]
    #[case(COL, 6, 0)]
    fn test_series_points_follow_configured_table(
        #[case] winner: i64,
        #[case] games: i32,
        #[case] expected: i32,
    ) {
        let mut config = PoolConfigModel::defaults("2025");
        config.points_for_correct_winner = 3;
        config.points_for_correct_games = 5;

        let outcome = SeriesOutcome::try_from(&finished_series()).unwrap();
        let table = SeriesPointTable::from(&config);
        assert_eq!(
            score_series_prediction(&prediction(winner, games), &outcome, &table),
            expected
        );
    }

    #[test]
    fn test_exact_pick_with_huge_table_does_not_overflow() {
        let table = SeriesPointTable {
            correct_winner: i32::MAX,
            correct_games: 1,
        };
        let outcome = SeriesOutcome::try_from(&finished_series()).unwrap();
        assert_eq!(
            score_series_prediction(&prediction(DAL, 6), &outcome, &table),
            i32::MAX
        );
    }

    #[test]
    fn test_outcome_requires_completed_series() {
        let mut series = finished_series();
        series.completed = false;
        assert!(matches!(
            SeriesOutcome::try_from(&series),
            Err(AppError::Precondition(_))
        ));

        let mut series = finished_series();
        series.winning_team_id = None;
        assert!(matches!(
            SeriesOutcome::try_from(&series),
            Err(AppError::Precondition(_))
        ));
    }

    #[test]
    fn test_outcome_counts_wins_not_reported_games() {
        let outcome = SeriesOutcome::try_from(&finished_series()).unwrap();
        assert_eq!(outcome.total_games, 6);
        assert_eq!(outcome.winning_team_id, DAL);
    }

    #[rstest]
    #[case(CAR, DAL, DAL, 6, 13)]
    #[case(CAR, DAL, DAL, 7, 10)]
    #[case(TOR, DAL, DAL, 6, 11)]
    #[case(TOR, COL, COL, 6, 0)]
    #[case(CAR, COL, CAR, 6, 2)]
    #[case(TOR, COL, DAL, 6, 9)]
    fn test_cup_points(
        #[case] east: i64,
        #[case] west: i64,
        #[case] winner: i64,
        #[case] games: i32,
        #[case] expected: i32,
    ) {
        let points = score_cup_prediction(
            &cup_prediction(east, west, winner, games),
            &cup_result(),
            &CupPointTable::default(),
        );
        assert_eq!(points, expected);
    }
}
