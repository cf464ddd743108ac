use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{PredictionModel, PredictionPick, PredictionState, SERIES_LENGTH},
    repository::{PredictionRepository, UpsertResult},
    types::{LeaderboardResponse, PredictionResponse, SubmitPredictionRequest},
};
use crate::auth::repository::UserRepository;
use crate::auth::AuthClaims;
use crate::leaderboard;
use crate::pool_config::repository::PoolConfigRepository;
use crate::rounds::repository::RoundRepository;
use crate::scoring::ScoringService;
use crate::series::models::SeriesModel;
use crate::series::repository::SeriesRepository;
use crate::shared::AppError;

/// Service driving the per-series prediction lifecycle
pub struct PredictionService {
    prediction_repository: Arc<dyn PredictionRepository>,
    series_repository: Arc<dyn SeriesRepository>,
    round_repository: Arc<dyn RoundRepository>,
    pool_config_repository: Arc<dyn PoolConfigRepository>,
    user_repository: Arc<dyn UserRepository>,
    scoring: ScoringService,
}

impl PredictionService {
    pub fn new(
        prediction_repository: Arc<dyn PredictionRepository>,
        series_repository: Arc<dyn SeriesRepository>,
        round_repository: Arc<dyn RoundRepository>,
        pool_config_repository: Arc<dyn PoolConfigRepository>,
        user_repository: Arc<dyn UserRepository>,
        scoring: ScoringService,
    ) -> Self {
        Self {
            prediction_repository,
            series_repository,
            round_repository,
            pool_config_repository,
            user_repository,
            scoring,
        }
    }

    async fn load_series(&self, series_id: i64) -> Result<SeriesModel, AppError> {
        self.series_repository
            .get_series(series_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Series {series_id} not found")))
    }

    /// Resolves whose prediction this is; only admins may act for someone else
    async fn target_user(&self, actor: &AuthClaims, requested: Option<i64>) -> Result<i64, AppError> {
        match requested {
            None => Ok(actor.user_id()),
            Some(user_id) if user_id == actor.user_id() => Ok(user_id),
            Some(user_id) if actor.is_admin => {
                if self.user_repository.get_user(user_id).await?.is_none() {
                    return Err(AppError::not_found(format!("User {user_id} not found")));
                }
                Ok(user_id)
            }
            Some(_) => Err(AppError::Forbidden(
                "Only admins can predict for other users".to_string(),
            )),
        }
    }

    /// Rejects non-admin picks once the series is final or, unless the season
    /// allows late picks, once it has started
    async fn ensure_open(&self, series: &SeriesModel) -> Result<(), AppError> {
        if series.completed {
            return Err(AppError::validation(
                "Series is already completed; predictions are locked",
            ));
        }
        if !series.has_started(Utc::now()) {
            return Ok(());
        }

        let allow_late = match self.round_repository.get_round(series.round_id).await? {
            Some(round) => {
                self.pool_config_repository
                    .config_or_default(&round.season)
                    .await?
                    .allow_late_predictions
            }
            None => false,
        };
        if allow_late {
            debug!(series_id = series.id, "Late prediction allowed by pool config");
            Ok(())
        } else {
            Err(AppError::validation(
                "Series has already started; late predictions are not allowed",
            ))
        }
    }

    /// NoPrediction -> Predicted, or Predicted -> Predicted on resubmission
    #[instrument(skip(self, actor, request), fields(actor = actor.sub, series_id = request.series_id))]
    pub async fn submit(
        &self,
        actor: &AuthClaims,
        request: SubmitPredictionRequest,
    ) -> Result<PredictionResponse, AppError> {
        let user_id = self.target_user(actor, request.user_id).await?;
        let series = self.load_series(request.series_id).await?;

        if !SERIES_LENGTH.contains(&request.predicted_games) {
            return Err(AppError::validation(format!(
                "Predicted games must be between {} and {}",
                SERIES_LENGTH.start(),
                SERIES_LENGTH.end()
            )));
        }
        if !series.involves(request.predicted_winner_id) {
            return Err(AppError::validation(
                "Predicted winner must be one of the series teams",
            ));
        }
        if !actor.is_admin {
            self.ensure_open(&series).await?;
        }

        let stored = self
            .prediction_repository
            .upsert_prediction(PredictionPick {
                user_id,
                series_id: series.id,
                predicted_winner_id: request.predicted_winner_id,
                predicted_games: request.predicted_games,
            })
            .await?;
        let created = matches!(stored, UpsertResult::Created(_));
        let mut prediction = stored.into_model();

        if series.completed {
            // Only admins get here; keep points in step with the final result
            prediction.points = self.scoring.score_prediction(&prediction, &series).await?;
        }

        info!(
            prediction_id = prediction.id,
            user_id,
            created,
            "Prediction saved"
        );
        let state = PredictionState::of(Some(&prediction), &series);
        Ok(PredictionResponse::new(prediction, state))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<PredictionResponse>, AppError> {
        let predictions = self.prediction_repository.list_by_user(user_id).await?;
        let series: HashMap<i64, SeriesModel> = self
            .series_repository
            .list_series(None)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(predictions
            .into_iter()
            .map(|prediction| {
                let state = match series.get(&prediction.series_id) {
                    Some(s) => PredictionState::of(Some(&prediction), s),
                    None => PredictionState::Predicted,
                };
                PredictionResponse::new(prediction, state)
            })
            .collect())
    }

    pub async fn list_for_series(
        &self,
        series_id: i64,
    ) -> Result<Vec<PredictionResponse>, AppError> {
        let series = self.load_series(series_id).await?;
        Ok(self
            .prediction_repository
            .list_by_series(series_id)
            .await?
            .into_iter()
            .map(|prediction| {
                let state = PredictionState::of(Some(&prediction), &series);
                PredictionResponse::new(prediction, state)
            })
            .collect())
    }

    /// Admin override of a prediction's points
    #[instrument(skip(self))]
    pub async fn override_points(
        &self,
        prediction_id: i64,
        points: i32,
    ) -> Result<PredictionResponse, AppError> {
        if points < 0 {
            return Err(AppError::validation("Points cannot be negative"));
        }
        let prediction = self
            .prediction_repository
            .get_prediction(prediction_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Prediction {prediction_id} not found")))?;

        self.prediction_repository
            .update_points(prediction_id, points)
            .await?;
        warn!(
            prediction_id,
            from = prediction.points,
            to = points,
            "Prediction points overridden by admin"
        );

        let series = self.load_series(prediction.series_id).await?;
        let updated = PredictionModel {
            points,
            ..prediction
        };
        let state = PredictionState::of(Some(&updated), &series);
        Ok(PredictionResponse::new(updated, state))
    }

    pub async fn leaderboard(&self) -> Result<LeaderboardResponse, AppError> {
        let users = self.user_repository.list_users().await?;
        let predictions = self.prediction_repository.list_all().await?;
        Ok(LeaderboardResponse {
            leaderboard: leaderboard::rank(&users, &predictions),
        })
    }
}
