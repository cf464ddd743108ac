use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{CupPick, CupPredictionModel, CupResultModel};
use crate::shared::AppError;

/// Trait for Stanley Cup prediction and result storage
#[async_trait]
pub trait CupRepository: Send + Sync {
    /// Creates the (user, season) prediction or overwrites its picks, leaving points untouched
    async fn upsert_prediction(&self, pick: CupPick) -> Result<CupPredictionModel, AppError>;
    async fn find_prediction(
        &self,
        user_id: i64,
        season: &str,
    ) -> Result<Option<CupPredictionModel>, AppError>;
    async fn list_predictions(&self, season: &str) -> Result<Vec<CupPredictionModel>, AppError>;
    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError>;

    /// Stores the season's final, replacing an earlier one
    async fn save_result(&self, result: &CupResultModel) -> Result<(), AppError>;
    async fn get_result(&self, season: &str) -> Result<Option<CupResultModel>, AppError>;
}

/// In-memory implementation of CupRepository for development and testing
pub struct InMemoryCupRepository {
    predictions: RwLock<HashMap<i64, CupPredictionModel>>,
    results: RwLock<HashMap<String, CupResultModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryCupRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCupRepository {
    pub fn new() -> Self {
        Self {
            predictions: RwLock::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CupRepository for InMemoryCupRepository {
    #[instrument(skip(self, pick), fields(user_id = pick.user_id, season = %pick.season))]
    async fn upsert_prediction(&self, pick: CupPick) -> Result<CupPredictionModel, AppError> {
        let mut predictions = self.predictions.write().await;
        let now = Utc::now();

        if let Some(existing) = predictions
            .values_mut()
            .find(|p| p.user_id == pick.user_id && p.season == pick.season)
        {
            existing.east_team_id = pick.east_team_id;
            existing.west_team_id = pick.west_team_id;
            existing.winner_team_id = pick.winner_team_id;
            existing.predicted_games = pick.predicted_games;
            existing.updated_at = now;
            debug!(prediction_id = existing.id, "Cup prediction updated in memory");
            return Ok(existing.clone());
        }

        let model = CupPredictionModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: pick.user_id,
            season: pick.season,
            east_team_id: pick.east_team_id,
            west_team_id: pick.west_team_id,
            winner_team_id: pick.winner_team_id,
            predicted_games: pick.predicted_games,
            points: 0,
            created_at: now,
            updated_at: now,
        };
        predictions.insert(model.id, model.clone());
        debug!(prediction_id = model.id, "Cup prediction created in memory");
        Ok(model)
    }

    async fn find_prediction(
        &self,
        user_id: i64,
        season: &str,
    ) -> Result<Option<CupPredictionModel>, AppError> {
        Ok(self
            .predictions
            .read()
            .await
            .values()
            .find(|p| p.user_id == user_id && p.season == season)
            .cloned())
    }

    async fn list_predictions(&self, season: &str) -> Result<Vec<CupPredictionModel>, AppError> {
        let mut found: Vec<CupPredictionModel> = self
            .predictions
            .read()
            .await
            .values()
            .filter(|p| p.season == season)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError> {
        let mut predictions = self.predictions.write().await;
        let prediction = predictions
            .get_mut(&prediction_id)
            .ok_or_else(|| AppError::not_found("Cup prediction not found"))?;
        prediction.points = points;
        prediction.updated_at = Utc::now();
        Ok(())
    }

    #[instrument(skip(self, result), fields(season = %result.season))]
    async fn save_result(&self, result: &CupResultModel) -> Result<(), AppError> {
        self.results
            .write()
            .await
            .insert(result.season.clone(), result.clone());
        debug!("Cup result saved in memory");
        Ok(())
    }

    async fn get_result(&self, season: &str) -> Result<Option<CupResultModel>, AppError> {
        Ok(self.results.read().await.get(season).cloned())
    }
}

const PREDICTION_COLUMNS: &str = "id, user_id, season, east_team_id, west_team_id, winner_team_id, predicted_games, points, created_at, updated_at";
const RESULT_COLUMNS: &str =
    "season, east_team_id, west_team_id, winning_team_id, games_played, recorded_at";

fn prediction_from_row(row: &PgRow) -> CupPredictionModel {
    CupPredictionModel {
        id: row.get("id"),
        user_id: row.get("user_id"),
        season: row.get("season"),
        east_team_id: row.get("east_team_id"),
        west_team_id: row.get("west_team_id"),
        winner_team_id: row.get("winner_team_id"),
        predicted_games: row.get("predicted_games"),
        points: row.get("points"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn result_from_row(row: &PgRow) -> CupResultModel {
    CupResultModel {
        season: row.get("season"),
        east_team_id: row.get("east_team_id"),
        west_team_id: row.get("west_team_id"),
        winning_team_id: row.get("winning_team_id"),
        games_played: row.get("games_played"),
        recorded_at: row.get("recorded_at"),
    }
}

/// PostgreSQL implementation of Cup repository
pub struct PostgresCupRepository {
    pool: PgPool,
}

impl PostgresCupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CupRepository for PostgresCupRepository {
    #[instrument(skip(self, pick), fields(user_id = pick.user_id, season = %pick.season))]
    async fn upsert_prediction(&self, pick: CupPick) -> Result<CupPredictionModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO stanley_cup_predictions
                 (user_id, season, east_team_id, west_team_id, winner_team_id, predicted_games, points, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $7)
             ON CONFLICT (user_id, season) DO UPDATE SET
                 east_team_id = EXCLUDED.east_team_id,
                 west_team_id = EXCLUDED.west_team_id,
                 winner_team_id = EXCLUDED.winner_team_id,
                 predicted_games = EXCLUDED.predicted_games,
                 updated_at = EXCLUDED.updated_at
             RETURNING {PREDICTION_COLUMNS}"
        ))
        .bind(pick.user_id)
        .bind(&pick.season)
        .bind(pick.east_team_id)
        .bind(pick.west_team_id)
        .bind(pick.winner_team_id)
        .bind(pick.predicted_games)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to upsert cup prediction");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(prediction_from_row(&row))
    }

    async fn find_prediction(
        &self,
        user_id: i64,
        season: &str,
    ) -> Result<Option<CupPredictionModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM stanley_cup_predictions WHERE user_id = $1 AND season = $2"
        ))
        .bind(user_id)
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| prediction_from_row(&row)))
    }

    async fn list_predictions(&self, season: &str) -> Result<Vec<CupPredictionModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM stanley_cup_predictions WHERE season = $1 ORDER BY id"
        ))
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(prediction_from_row).collect())
    }

    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE stanley_cup_predictions SET points = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(prediction_id)
        .bind(points)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Cup prediction not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, result), fields(season = %result.season))]
    async fn save_result(&self, result: &CupResultModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO stanley_cup_results
                 (season, east_team_id, west_team_id, winning_team_id, games_played, recorded_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (season) DO UPDATE SET
                 east_team_id = EXCLUDED.east_team_id,
                 west_team_id = EXCLUDED.west_team_id,
                 winning_team_id = EXCLUDED.winning_team_id,
                 games_played = EXCLUDED.games_played,
                 recorded_at = EXCLUDED.recorded_at",
        )
        .bind(&result.season)
        .bind(result.east_team_id)
        .bind(result.west_team_id)
        .bind(result.winning_team_id)
        .bind(result.games_played)
        .bind(result.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save cup result");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }

    async fn get_result(&self, season: &str) -> Result<Option<CupResultModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {RESULT_COLUMNS} FROM stanley_cup_results WHERE season = $1"
        ))
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| result_from_row(&row)))
    }
}
