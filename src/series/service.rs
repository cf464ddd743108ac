use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::{
    models::{NewSeries, SeriesModel},
    recorder::{apply_result, ResultTransition, SeriesResult},
    repository::SeriesRepository,
};
use crate::rounds::repository::RoundRepository;
use crate::scoring::{ScoringService, ScoringSummary};
use crate::shared::AppError;
use crate::teams::repository::TeamRepository;

/// Checks that a matchup names two distinct, existing teams
pub(crate) async fn validate_matchup(
    teams: &dyn TeamRepository,
    home_team_id: i64,
    away_team_id: i64,
) -> Result<(), AppError> {
    if home_team_id == away_team_id {
        return Err(AppError::validation(
            "Home and away teams must be different",
        ));
    }
    for team_id in [home_team_id, away_team_id] {
        if teams.get_team(team_id).await?.is_none() {
            return Err(AppError::not_found(format!("Team {team_id} not found")));
        }
    }
    Ok(())
}

/// Service for series scheduling and result recording
pub struct SeriesService {
    series_repository: Arc<dyn SeriesRepository>,
    round_repository: Arc<dyn RoundRepository>,
    team_repository: Arc<dyn TeamRepository>,
    scoring: ScoringService,
}

impl SeriesService {
    pub fn new(
        series_repository: Arc<dyn SeriesRepository>,
        round_repository: Arc<dyn RoundRepository>,
        team_repository: Arc<dyn TeamRepository>,
        scoring: ScoringService,
    ) -> Self {
        Self {
            series_repository,
            round_repository,
            team_repository,
            scoring,
        }
    }

    #[instrument(skip(self, series), fields(round_id = series.round_id))]
    pub async fn create_series(&self, series: NewSeries) -> Result<SeriesModel, AppError> {
        if self
            .round_repository
            .get_round(series.round_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(format!(
                "Round {} not found",
                series.round_id
            )));
        }
        validate_matchup(
            self.team_repository.as_ref(),
            series.home_team_id,
            series.away_team_id,
        )
        .await?;

        let created = self.series_repository.create_series(series).await?;
        info!(series_id = created.id, "Series created");
        Ok(created)
    }

    pub async fn get_series(&self, series_id: i64) -> Result<SeriesModel, AppError> {
        self.series_repository
            .get_series(series_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Series {series_id} not found")))
    }

    pub async fn list_series(&self, round_id: Option<i64>) -> Result<Vec<SeriesModel>, AppError> {
        self.series_repository.list_series(round_id).await
    }

    /// Records a reported tally, then scores or resets the series' predictions.
    ///
    /// The series row is written first. A scoring failure after that is
    /// returned to the caller and can be repaired with `rescore`.
    #[instrument(skip(self, result))]
    pub async fn record_result(
        &self,
        series_id: i64,
        result: SeriesResult,
    ) -> Result<SeriesModel, AppError> {
        let current = self.get_series(series_id).await?;
        let recorded = apply_result(&current, &result, Utc::now())?;
        self.series_repository.update_series(&recorded.series).await?;

        info!(
            transition = ?recorded.transition,
            home_wins = recorded.series.home_team_wins,
            away_wins = recorded.series.away_team_wins,
            "Series result recorded"
        );

        let cascade = match recorded.transition {
            ResultTransition::Completed | ResultTransition::Corrected => {
                self.scoring.score_series(&recorded.series).await
            }
            ResultTransition::Reopened => self.scoring.reset_series(series_id).await,
            ResultTransition::InProgress => Ok(ScoringSummary::default()),
        };
        if let Err(e) = cascade {
            error!(error = %e, "Scoring failed after series was saved");
            return Err(e);
        }

        Ok(recorded.series)
    }

    /// Re-runs scoring for a completed series
    #[instrument(skip(self))]
    pub async fn rescore(&self, series_id: i64) -> Result<ScoringSummary, AppError> {
        let series = self.get_series(series_id).await?;
        self.scoring.score_series(&series).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::models::PredictionPick;
    use crate::predictions::repository::PredictionRepository;
    use crate::rounds::models::NewRound;
    use crate::shared::test_utils::{create_team, AppStateBuilder};
    use crate::shared::AppState;
    use crate::teams::models::{Conference, Division};

    struct Setup {
        state: AppState,
        series: SeriesModel,
    }

    async fn setup() -> Setup {
        let state = AppStateBuilder::new().build();
        let dal = create_team(&state, "DAL", Conference::Western, Division::Central).await;
        let col = create_team(&state, "COL", Conference::Western, Division::Central).await;
        let round = state
            .round_repository
            .create_round(NewRound {
                name: "First Round".to_string(),
                number: 1,
                season: "2025".to_string(),
                is_active: true,
            })
            .await
            .unwrap();
        let series = state
            .series_service()
            .create_series(NewSeries {
                round_id: round.id,
                home_team_id: dal.id,
                away_team_id: col.id,
                start_date: None,
            })
            .await
            .unwrap();
        Setup { state, series }
    }

    fn tally(home: i32, away: i32, completed: bool) -> SeriesResult {
        SeriesResult {
            home_team_wins: home,
            away_team_wins: away,
            games_played: home + away,
            completed,
            start_date: None,
            end_date: None,
        }
    }

    async fn predict(state: &AppState, user_id: i64, series_id: i64, winner: i64, games: i32) -> i64 {
        state
            .prediction_repository
            .upsert_prediction(PredictionPick {
                user_id,
                series_id,
                predicted_winner_id: winner,
                predicted_games: games,
            })
            .await
            .unwrap()
            .into_model()
            .id
    }

    async fn points_of(state: &AppState, prediction_id: i64) -> i32 {
        state
            .prediction_repository
            .get_prediction(prediction_id)
            .await
            .unwrap()
            .unwrap()
            .points
    }

    #[tokio::test]
    async fn test_create_series_rejects_same_team() {
        let Setup { state, series } = setup().await;
        let result = state
            .series_service()
            .create_series(NewSeries {
                round_id: series.round_id,
                home_team_id: series.home_team_id,
                away_team_id: series.home_team_id,
                start_date: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_series_requires_round_and_teams() {
        let Setup { state, series } = setup().await;
        let service = state.series_service();

        let missing_round = service
            .create_series(NewSeries {
                round_id: 99,
                home_team_id: series.home_team_id,
                away_team_id: series.away_team_id,
                start_date: None,
            })
            .await;
        assert!(matches!(missing_round, Err(AppError::NotFound(_))));

        let missing_team = service
            .create_series(NewSeries {
                round_id: series.round_id,
                home_team_id: series.home_team_id,
                away_team_id: 99,
                start_date: None,
            })
            .await;
        assert!(matches!(missing_team, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_completing_series_scores_predictions() {
        let Setup { state, series } = setup().await;
        let exact = predict(&state, 1, series.id, series.home_team_id, 6).await;
        let wrong = predict(&state, 2, series.id, series.away_team_id, 6).await;

        let updated = state
            .series_service()
            .record_result(series.id, tally(4, 2, false))
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.winning_team_id, Some(series.home_team_id));
        assert_eq!(points_of(&state, exact).await, 3);
        assert_eq!(points_of(&state, wrong).await, 0);
    }

    #[tokio::test]
    async fn test_in_progress_update_does_not_score() {
        let Setup { state, series } = setup().await;
        let prediction = predict(&state, 1, series.id, series.home_team_id, 5).await;

        let updated = state
            .series_service()
            .record_result(series.id, tally(3, 1, false))
            .await
            .unwrap();
        assert!(!updated.completed);
        assert_eq!(points_of(&state, prediction).await, 0);
    }

    #[tokio::test]
    async fn test_correction_rescores_and_reopen_resets() {
        let Setup { state, series } = setup().await;
        let prediction = predict(&state, 1, series.id, series.home_team_id, 7).await;
        let service = state.series_service();

        service.record_result(series.id, tally(4, 2, true)).await.unwrap();
        assert_eq!(points_of(&state, prediction).await, 1);

        service.record_result(series.id, tally(4, 3, true)).await.unwrap();
        assert_eq!(points_of(&state, prediction).await, 3);

        service.record_result(series.id, tally(3, 3, false)).await.unwrap();
        assert_eq!(points_of(&state, prediction).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_tally_leaves_series_untouched() {
        let Setup { state, series } = setup().await;
        let service = state.series_service();

        let result = service.record_result(series.id, tally(5, 0, false)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.get_series(series.id).await.unwrap(), series);
    }

    #[tokio::test]
    async fn test_rescore_requires_completed_series() {
        let Setup { state, series } = setup().await;
        let service = state.series_service();

        assert!(matches!(
            service.rescore(series.id).await,
            Err(AppError::Precondition(_))
        ));
        assert!(matches!(
            service.rescore(999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
