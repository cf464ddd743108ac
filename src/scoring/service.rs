use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::rules::{
    score_cup_prediction, score_series_prediction, CupPointTable, SeriesOutcome, SeriesPointTable,
};
use crate::pool_config::repository::PoolConfigRepository;
use crate::predictions::models::PredictionModel;
use crate::predictions::repository::PredictionRepository;
use crate::rounds::repository::RoundRepository;
use crate::series::models::SeriesModel;
use crate::shared::AppError;
use crate::stanley_cup::models::CupResultModel;
use crate::stanley_cup::repository::CupRepository;

/// What a scoring pass touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSummary {
    pub predictions_scored: usize,
    pub predictions_changed: usize,
}

impl ScoringSummary {
    fn record(&mut self, changed: bool) {
        self.predictions_scored += 1;
        if changed {
            self.predictions_changed += 1;
        }
    }

    /// Adds another pass's counts to this one
    pub fn absorb(&mut self, other: ScoringSummary) {
        self.predictions_scored += other.predictions_scored;
        self.predictions_changed += other.predictions_changed;
    }
}

/// Writes rule-derived points back to stored predictions.
///
/// Every pass recomputes from the final state and only writes values that
/// differ, so running it again after a partial failure is safe.
pub struct ScoringService {
    prediction_repository: Arc<dyn PredictionRepository>,
    cup_repository: Arc<dyn CupRepository>,
    round_repository: Arc<dyn RoundRepository>,
    pool_config_repository: Arc<dyn PoolConfigRepository>,
}

impl ScoringService {
    pub fn new(
        prediction_repository: Arc<dyn PredictionRepository>,
        cup_repository: Arc<dyn CupRepository>,
        round_repository: Arc<dyn RoundRepository>,
        pool_config_repository: Arc<dyn PoolConfigRepository>,
    ) -> Self {
        Self {
            prediction_repository,
            cup_repository,
            round_repository,
            pool_config_repository,
        }
    }

    /// Point table configured for the season the series is played in
    async fn series_point_table(&self, series: &SeriesModel) -> Result<SeriesPointTable, AppError> {
        let Some(round) = self.round_repository.get_round(series.round_id).await? else {
            debug!(round_id = series.round_id, "Round missing, using default point table");
            return Ok(SeriesPointTable::default());
        };
        let config = self
            .pool_config_repository
            .config_or_default(&round.season)
            .await?;
        Ok(SeriesPointTable::from(&config))
    }

    /// Scores every prediction on a completed series
    #[instrument(skip(self, series), fields(series_id = series.id))]
    pub async fn score_series(&self, series: &SeriesModel) -> Result<ScoringSummary, AppError> {
        let outcome = SeriesOutcome::try_from(series)?;
        let table = self.series_point_table(series).await?;

        let mut summary = ScoringSummary::default();
        for prediction in self.prediction_repository.list_by_series(series.id).await? {
            let points = score_series_prediction(&prediction, &outcome, &table);
            summary.record(self.write_points(&prediction, points).await?);
        }

        info!(
            scored = summary.predictions_scored,
            changed = summary.predictions_changed,
            "Series predictions scored"
        );
        Ok(summary)
    }

    /// Scores a single prediction against its completed series
    pub async fn score_prediction(
        &self,
        prediction: &PredictionModel,
        series: &SeriesModel,
    ) -> Result<i32, AppError> {
        let outcome = SeriesOutcome::try_from(series)?;
        let table = self.series_point_table(series).await?;
        let points = score_series_prediction(prediction, &outcome, &table);
        self.write_points(prediction, points).await?;
        Ok(points)
    }

    /// Zeroes the points of a series that is no longer final
    #[instrument(skip(self))]
    pub async fn reset_series(&self, series_id: i64) -> Result<ScoringSummary, AppError> {
        let mut summary = ScoringSummary::default();
        for prediction in self.prediction_repository.list_by_series(series_id).await? {
            summary.record(self.write_points(&prediction, 0).await?);
        }

        info!(changed = summary.predictions_changed, "Series points reset");
        Ok(summary)
    }

    /// Scores every Stanley Cup prediction of the result's season
    #[instrument(skip(self, result), fields(season = %result.season))]
    pub async fn score_cup(&self, result: &CupResultModel) -> Result<ScoringSummary, AppError> {
        let table = CupPointTable::default();

        let mut summary = ScoringSummary::default();
        for prediction in self.cup_repository.list_predictions(&result.season).await? {
            let points = score_cup_prediction(&prediction, result, &table);
            let changed = prediction.points != points;
            if changed {
                self.cup_repository
                    .update_points(prediction.id, points)
                    .await?;
            }
            summary.record(changed);
        }

        info!(
            scored = summary.predictions_scored,
            changed = summary.predictions_changed,
            "Stanley Cup predictions scored"
        );
        Ok(summary)
    }

    async fn write_points(&self, prediction: &PredictionModel, points: i32) -> Result<bool, AppError> {
        if prediction.points == points {
            return Ok(false);
        }
        debug!(prediction_id = prediction.id, from = prediction.points, to = points, "Updating points");
        self.prediction_repository
            .update_points(prediction.id, points)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool_config::repository::InMemoryPoolConfigRepository;
    use crate::pool_config::PoolConfigModel;
    use crate::predictions::models::PredictionPick;
    use crate::predictions::repository::InMemoryPredictionRepository;
    use crate::rounds::models::NewRound;
    use crate::rounds::repository::InMemoryRoundRepository;
    use crate::stanley_cup::models::CupPick;
    use crate::stanley_cup::repository::InMemoryCupRepository;
    use chrono::Utc;

    const DAL: i64 = 1;
    const COL: i64 = 2;

    struct Fixture {
        predictions: Arc<InMemoryPredictionRepository>,
        cup: Arc<InMemoryCupRepository>,
        rounds: Arc<InMemoryRoundRepository>,
        configs: Arc<InMemoryPoolConfigRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                predictions: Arc::new(InMemoryPredictionRepository::new()),
                cup: Arc::new(InMemoryCupRepository::new()),
                rounds: Arc::new(InMemoryRoundRepository::new()),
                configs: Arc::new(InMemoryPoolConfigRepository::new()),
            }
        }

        fn service(&self) -> ScoringService {
            ScoringService::new(
                self.predictions.clone(),
                self.cup.clone(),
                self.rounds.clone(),
                self.configs.clone(),
            )
        }

        async fn round(&self, season: &str) -> i64 {
            self.rounds
                .create_round(NewRound {
                    name: "First Round".to_string(),
                    number: 1,
                    season: season.to_string(),
                    is_active: true,
                })
                .await
                .unwrap()
                .id
        }

        async fn predict(&self, user_id: i64, winner: i64, games: i32) -> i64 {
            self.predictions
                .upsert_prediction(PredictionPick {
                    user_id,
                    series_id: 1,
                    predicted_winner_id: winner,
                    predicted_games: games,
                })
                .await
                .unwrap()
                .into_model()
                .id
        }

        async fn points_of(&self, prediction_id: i64) -> i32 {
            self.predictions
                .get_prediction(prediction_id)
                .await
                .unwrap()
                .unwrap()
                .points
        }
    }

    fn dal_in_six(round_id: i64, completed: bool) -> SeriesModel {
        SeriesModel {
            id: 1,
            round_id,
            home_team_id: DAL,
            away_team_id: COL,
            home_team_wins: if completed { 4 } else { 3 },
            away_team_wins: 2,
            games_played: if completed { 6 } else { 5 },
            winning_team_id: completed.then_some(DAL),
            completed,
            start_date: None,
            end_date: completed.then(Utc::now),
        }
    }

    #[tokio::test]
    async fn test_score_series_writes_points() {
        let fixture = Fixture::new();
        let round_id = fixture.round("2025").await;
        let exact = fixture.predict(1, DAL, 6).await;
        let winner_only = fixture.predict(2, DAL, 7).await;
        let wrong = fixture.predict(3, COL, 6).await;

        let summary = fixture
            .service()
            .score_series(&dal_in_six(round_id, true))
            .await
            .unwrap();

        assert_eq!(summary.predictions_scored, 3);
        assert_eq!(summary.predictions_changed, 2);
        assert_eq!(fixture.points_of(exact).await, 3);
        assert_eq!(fixture.points_of(winner_only).await, 1);
        assert_eq!(fixture.points_of(wrong).await, 0);
    }

    #[tokio::test]
    async fn test_rescoring_is_idempotent() {
        let fixture = Fixture::new();
        let round_id = fixture.round("2025").await;
        let exact = fixture.predict(1, DAL, 6).await;
        let service = fixture.service();
        let series = dal_in_six(round_id, true);

        service.score_series(&series).await.unwrap();
        let second = service.score_series(&series).await.unwrap();

        assert_eq!(second.predictions_changed, 0);
        assert_eq!(fixture.points_of(exact).await, 3);
    }

    #[tokio::test]
    async fn test_scoring_reads_season_config() {
        let fixture = Fixture::new();
        let round_id = fixture.round("2030").await;
        let mut config = PoolConfigModel::defaults("2030");
        config.points_for_correct_winner = 5;
        config.points_for_correct_games = 10;
        fixture.configs.save_config(&config).await.unwrap();
        let exact = fixture.predict(1, DAL, 6).await;

        fixture
            .service()
            .score_series(&dal_in_six(round_id, true))
            .await
            .unwrap();
        assert_eq!(fixture.points_of(exact).await, 15);
    }

    #[tokio::test]
    async fn test_incomplete_series_is_a_precondition_failure() {
        let fixture = Fixture::new();
        let round_id = fixture.round("2025").await;
        fixture.predict(1, DAL, 6).await;

        let result = fixture
            .service()
            .score_series(&dal_in_six(round_id, false))
            .await;
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[tokio::test]
    async fn test_reset_series_zeroes_points() {
        let fixture = Fixture::new();
        let round_id = fixture.round("2025").await;
        let exact = fixture.predict(1, DAL, 6).await;
        let service = fixture.service();
        service
            .score_series(&dal_in_six(round_id, true))
            .await
            .unwrap();

        let summary = service.reset_series(1).await.unwrap();
        assert_eq!(summary.predictions_changed, 1);
        assert_eq!(fixture.points_of(exact).await, 0);
    }

    #[tokio::test]
    async fn test_score_cup() {
        let fixture = Fixture::new();
        let result = CupResultModel {
            season: "2025".to_string(),
            east_team_id: 3,
            west_team_id: DAL,
            winning_team_id: DAL,
            games_played: 6,
            recorded_at: Utc::now(),
        };
        for (user_id, east, games) in [(1, 3, 6), (2, 3, 7), (3, 4, 6)] {
            fixture
                .cup
                .upsert_prediction(CupPick {
                    user_id,
                    season: "2025".to_string(),
                    east_team_id: east,
                    west_team_id: DAL,
                    winner_team_id: DAL,
                    predicted_games: games,
                })
                .await
                .unwrap();
        }

        let summary = fixture.service().score_cup(&result).await.unwrap();
        assert_eq!(summary.predictions_scored, 3);

        let points: Vec<i32> = fixture
            .cup
            .list_predictions("2025")
            .await
            .unwrap()
            .iter()
            .map(|p| p.points)
            .collect();
        assert_eq!(points, vec![13, 10, 11]);
    }
}
