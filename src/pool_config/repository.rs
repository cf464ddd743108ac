use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::PoolConfigModel;
use crate::shared::AppError;

#[async_trait]
pub trait PoolConfigRepository: Send + Sync {
    async fn get_config(&self, season: &str) -> Result<Option<PoolConfigModel>, AppError>;
    async fn save_config(&self, config: &PoolConfigModel) -> Result<(), AppError>;

    /// Stored settings for the season, or the defaults when none are stored
    async fn config_or_default(&self, season: &str) -> Result<PoolConfigModel, AppError> {
        Ok(self
            .get_config(season)
            .await?
            .unwrap_or_else(|| PoolConfigModel::defaults(season)))
    }
}

/// In-memory implementation of PoolConfigRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPoolConfigRepository {
    configs: RwLock<HashMap<String, PoolConfigModel>>,
}

impl InMemoryPoolConfigRepository {
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PoolConfigRepository for InMemoryPoolConfigRepository {
    async fn get_config(&self, season: &str) -> Result<Option<PoolConfigModel>, AppError> {
        Ok(self.configs.read().await.get(season).cloned())
    }

    #[instrument(skip(self, config), fields(season = %config.season))]
    async fn save_config(&self, config: &PoolConfigModel) -> Result<(), AppError> {
        self.configs
            .write()
            .await
            .insert(config.season.clone(), config.clone());
        debug!("Pool config saved in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of pool config repository
pub struct PostgresPoolConfigRepository {
    pool: PgPool,
}

impl PostgresPoolConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PoolConfigRepository for PostgresPoolConfigRepository {
    async fn get_config(&self, season: &str) -> Result<Option<PoolConfigModel>, AppError> {
        let row = sqlx::query(
            "SELECT season, allow_late_predictions, points_for_correct_winner, points_for_correct_games,
                    points_for_finalist_team, points_for_champion, points_for_champion_games, updated_at
             FROM pool_config WHERE season = $1",
        )
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| PoolConfigModel {
            season: row.get("season"),
            allow_late_predictions: row.get("allow_late_predictions"),
            points_for_correct_winner: row.get("points_for_correct_winner"),
            points_for_correct_games: row.get("points_for_correct_games"),
            points_for_finalist_team: row.get("points_for_finalist_team"),
            points_for_champion: row.get("points_for_champion"),
            points_for_champion_games: row.get("points_for_champion_games"),
            updated_at: row.get("updated_at"),
        }))
    }

    #[instrument(skip(self, config), fields(season = %config.season))]
    async fn save_config(&self, config: &PoolConfigModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO pool_config (season, allow_late_predictions, points_for_correct_winner,
                 points_for_correct_games, points_for_finalist_team, points_for_champion,
                 points_for_champion_games, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (season) DO UPDATE SET
                 allow_late_predictions = EXCLUDED.allow_late_predictions,
                 points_for_correct_winner = EXCLUDED.points_for_correct_winner,
                 points_for_correct_games = EXCLUDED.points_for_correct_games,
                 points_for_finalist_team = EXCLUDED.points_for_finalist_team,
                 points_for_champion = EXCLUDED.points_for_champion,
                 points_for_champion_games = EXCLUDED.points_for_champion_games,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(&config.season)
        .bind(config.allow_late_predictions)
        .bind(config.points_for_correct_winner)
        .bind(config.points_for_correct_games)
        .bind(config.points_for_finalist_team)
        .bind(config.points_for_champion)
        .bind(config.points_for_champion_games)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save pool config");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }
}
