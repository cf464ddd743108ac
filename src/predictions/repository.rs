use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{PredictionModel, PredictionPick};
use crate::shared::AppError;

/// Result of storing a pick
#[derive(Debug, Clone)]
pub enum UpsertResult {
    Created(PredictionModel),
    Updated(PredictionModel),
}

impl UpsertResult {
    pub fn into_model(self) -> PredictionModel {
        match self {
            UpsertResult::Created(model) | UpsertResult::Updated(model) => model,
        }
    }
}

/// Trait for prediction repository operations
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Creates the (user, series) prediction or overwrites its pick, leaving points untouched
    async fn upsert_prediction(&self, pick: PredictionPick) -> Result<UpsertResult, AppError>;
    async fn get_prediction(&self, prediction_id: i64)
        -> Result<Option<PredictionModel>, AppError>;
    async fn find_prediction(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<PredictionModel>, AppError>;
    async fn list_by_series(&self, series_id: i64) -> Result<Vec<PredictionModel>, AppError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PredictionModel>, AppError>;
    async fn list_all(&self) -> Result<Vec<PredictionModel>, AppError>;
    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError>;
}

/// In-memory implementation of PredictionRepository for development and testing
pub struct InMemoryPredictionRepository {
    predictions: RwLock<HashMap<i64, PredictionModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            predictions: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    async fn filtered(&self, keep: impl Fn(&PredictionModel) -> bool) -> Vec<PredictionModel> {
        let mut found: Vec<PredictionModel> = self
            .predictions
            .read()
            .await
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        found
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    #[instrument(skip(self, pick), fields(user_id = pick.user_id, series_id = pick.series_id))]
    async fn upsert_prediction(&self, pick: PredictionPick) -> Result<UpsertResult, AppError> {
        let mut predictions = self.predictions.write().await;
        let now = Utc::now();

        if let Some(existing) = predictions
            .values_mut()
            .find(|p| p.user_id == pick.user_id && p.series_id == pick.series_id)
        {
            existing.predicted_winner_id = pick.predicted_winner_id;
            existing.predicted_games = pick.predicted_games;
            existing.updated_at = now;
            debug!(prediction_id = existing.id, "Prediction updated in memory");
            return Ok(UpsertResult::Updated(existing.clone()));
        }

        let model = PredictionModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: pick.user_id,
            series_id: pick.series_id,
            predicted_winner_id: pick.predicted_winner_id,
            predicted_games: pick.predicted_games,
            points: 0,
            created_at: now,
            updated_at: now,
        };
        predictions.insert(model.id, model.clone());
        debug!(prediction_id = model.id, "Prediction created in memory");
        Ok(UpsertResult::Created(model))
    }

    async fn get_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Option<PredictionModel>, AppError> {
        Ok(self.predictions.read().await.get(&prediction_id).cloned())
    }

    async fn find_prediction(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<PredictionModel>, AppError> {
        Ok(self
            .filtered(|p| p.user_id == user_id && p.series_id == series_id)
            .await
            .into_iter()
            .next())
    }

    async fn list_by_series(&self, series_id: i64) -> Result<Vec<PredictionModel>, AppError> {
        Ok(self.filtered(|p| p.series_id == series_id).await)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PredictionModel>, AppError> {
        Ok(self.filtered(|p| p.user_id == user_id).await)
    }

    async fn list_all(&self) -> Result<Vec<PredictionModel>, AppError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError> {
        let mut predictions = self.predictions.write().await;
        match predictions.get_mut(&prediction_id) {
            Some(prediction) => {
                prediction.points = points;
                prediction.updated_at = Utc::now();
                Ok(())
            }
            None => {
                warn!(prediction_id, "Prediction not found for points update in memory");
                Err(AppError::not_found("Prediction not found"))
            }
        }
    }
}

const PREDICTION_COLUMNS: &str =
    "id, user_id, series_id, predicted_winner_id, predicted_games, points, created_at, updated_at";

fn prediction_from_row(row: &PgRow) -> PredictionModel {
    PredictionModel {
        id: row.get("id"),
        user_id: row.get("user_id"),
        series_id: row.get("series_id"),
        predicted_winner_id: row.get("predicted_winner_id"),
        predicted_games: row.get("predicted_games"),
        points: row.get("points"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL implementation of prediction repository
pub struct PostgresPredictionRepository {
    pool: PgPool,
}

impl PostgresPredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        clause: &str,
        value: Option<i64>,
    ) -> Result<Vec<PredictionModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions {clause} ORDER BY id"
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(prediction_from_row).collect())
    }
}

#[async_trait]
impl PredictionRepository for PostgresPredictionRepository {
    #[instrument(skip(self, pick), fields(user_id = pick.user_id, series_id = pick.series_id))]
    async fn upsert_prediction(&self, pick: PredictionPick) -> Result<UpsertResult, AppError> {
        let now = Utc::now();
        // xmax is zero only for freshly inserted rows
        let row = sqlx::query(&format!(
            "INSERT INTO predictions (user_id, series_id, predicted_winner_id, predicted_games, points, created_at, updated_at)
             VALUES ($1, $2, $3, $4, 0, $5, $5)
             ON CONFLICT (user_id, series_id) DO UPDATE SET
                 predicted_winner_id = EXCLUDED.predicted_winner_id,
                 predicted_games = EXCLUDED.predicted_games,
                 updated_at = EXCLUDED.updated_at
             RETURNING {PREDICTION_COLUMNS}, (xmax = 0) AS inserted"
        ))
        .bind(pick.user_id)
        .bind(pick.series_id)
        .bind(pick.predicted_winner_id)
        .bind(pick.predicted_games)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to upsert prediction");
            AppError::DatabaseError(e.to_string())
        })?;

        let model = prediction_from_row(&row);
        if row.get::<bool, _>("inserted") {
            Ok(UpsertResult::Created(model))
        } else {
            Ok(UpsertResult::Updated(model))
        }
    }

    async fn get_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Option<PredictionModel>, AppError> {
        Ok(self
            .fetch_where("WHERE id = $1", Some(prediction_id))
            .await?
            .into_iter()
            .next())
    }

    async fn find_prediction(
        &self,
        user_id: i64,
        series_id: i64,
    ) -> Result<Option<PredictionModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE user_id = $1 AND series_id = $2"
        ))
        .bind(user_id)
        .bind(series_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| prediction_from_row(&row)))
    }

    async fn list_by_series(&self, series_id: i64) -> Result<Vec<PredictionModel>, AppError> {
        self.fetch_where("WHERE series_id = $1", Some(series_id)).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PredictionModel>, AppError> {
        self.fetch_where("WHERE user_id = $1", Some(user_id)).await
    }

    async fn list_all(&self) -> Result<Vec<PredictionModel>, AppError> {
        self.fetch_where("WHERE $1::BIGINT IS NULL", None).await
    }

    async fn update_points(&self, prediction_id: i64, points: i32) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE predictions SET points = $2, updated_at = $3 WHERE id = $1")
                .bind(prediction_id)
                .bind(points)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Prediction not found"));
        }
        Ok(())
    }
}
