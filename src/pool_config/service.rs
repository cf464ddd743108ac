use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::{
    models::{PoolConfigModel, POINT_VALUES},
    repository::PoolConfigRepository,
    types::PoolConfigPayload,
};
use crate::rounds::repository::RoundRepository;
use crate::scoring::{ScoringService, ScoringSummary, SeriesPointTable};
use crate::series::repository::SeriesRepository;
use crate::shared::AppError;

/// Service for per-season pool settings
pub struct PoolConfigService {
    pool_config_repository: Arc<dyn PoolConfigRepository>,
    round_repository: Arc<dyn RoundRepository>,
    series_repository: Arc<dyn SeriesRepository>,
    scoring: ScoringService,
    default_season: String,
}

impl PoolConfigService {
    pub fn new(
        pool_config_repository: Arc<dyn PoolConfigRepository>,
        round_repository: Arc<dyn RoundRepository>,
        series_repository: Arc<dyn SeriesRepository>,
        scoring: ScoringService,
        default_season: String,
    ) -> Self {
        Self {
            pool_config_repository,
            round_repository,
            series_repository,
            scoring,
            default_season,
        }
    }

    /// Stored settings for the season, or the defaults for an unconfigured one
    pub async fn get_config(&self, season: Option<String>) -> Result<PoolConfigModel, AppError> {
        let season = season.unwrap_or_else(|| self.default_season.clone());
        self.pool_config_repository.config_or_default(&season).await
    }

    /// Saves the season's settings.
    ///
    /// Completed series of the season are rescored when the series point
    /// table changes, so stored points always follow the current table.
    #[instrument(skip(self, payload), fields(season = %payload.season))]
    pub async fn update_config(
        &self,
        payload: PoolConfigPayload,
    ) -> Result<PoolConfigModel, AppError> {
        let config = validate(payload)?;
        let previous = self
            .pool_config_repository
            .config_or_default(&config.season)
            .await?;
        self.pool_config_repository.save_config(&config).await?;
        info!(
            allow_late_predictions = config.allow_late_predictions,
            "Pool config updated"
        );

        if SeriesPointTable::from(&previous) != SeriesPointTable::from(&config) {
            if let Err(e) = self.rescore_season(&config.season).await {
                error!(error = %e, "Config saved but rescoring the season failed");
                return Err(e);
            }
        }
        Ok(config)
    }

    /// Re-runs scoring on every completed series of the season
    #[instrument(skip(self))]
    pub async fn rescore_season(&self, season: &str) -> Result<ScoringSummary, AppError> {
        let mut summary = ScoringSummary::default();
        for round in self.round_repository.list_rounds(Some(season)).await? {
            for series in self.series_repository.list_series(Some(round.id)).await? {
                if series.completed {
                    summary.absorb(self.scoring.score_series(&series).await?);
                }
            }
        }

        info!(
            scored = summary.predictions_scored,
            changed = summary.predictions_changed,
            "Season rescored with new point table"
        );
        Ok(summary)
    }
}

fn validate(payload: PoolConfigPayload) -> Result<PoolConfigModel, AppError> {
    let season = payload.season.trim().to_string();
    if season.is_empty() {
        return Err(AppError::validation("Season is required"));
    }

    let points = [
        payload.points_for_correct_winner,
        payload.points_for_correct_games,
        payload.points_for_finalist_team,
        payload.points_for_champion,
        payload.points_for_champion_games,
    ];
    if points.iter().any(|p| !POINT_VALUES.contains(p)) {
        return Err(AppError::validation(format!(
            "Point values must be between {} and {}",
            POINT_VALUES.start(),
            POINT_VALUES.end()
        )));
    }

    Ok(PoolConfigModel {
        season,
        allow_late_predictions: payload.allow_late_predictions,
        points_for_correct_winner: payload.points_for_correct_winner,
        points_for_correct_games: payload.points_for_correct_games,
        points_for_finalist_team: payload.points_for_finalist_team,
        points_for_champion: payload.points_for_champion,
        points_for_champion_games: payload.points_for_champion_games,
        updated_at: Some(Utc::now()),
    })
}
