use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewSeries, SeriesModel};
use crate::shared::AppError;

/// Trait for series repository operations
#[async_trait]
pub trait SeriesRepository: Send + Sync {
    async fn create_series(&self, series: NewSeries) -> Result<SeriesModel, AppError>;
    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesModel>, AppError>;

    /// All series, or those of one round, ordered by id
    async fn list_series(&self, round_id: Option<i64>) -> Result<Vec<SeriesModel>, AppError>;

    async fn update_series(&self, series: &SeriesModel) -> Result<(), AppError>;
}

/// In-memory implementation of SeriesRepository for development and testing
pub struct InMemorySeriesRepository {
    series: RwLock<HashMap<i64, SeriesModel>>,
    next_id: AtomicI64,
}

impl Default for InMemorySeriesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySeriesRepository {
    pub fn new() -> Self {
        Self {
            series: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl SeriesRepository for InMemorySeriesRepository {
    #[instrument(skip(self, series), fields(round_id = series.round_id))]
    async fn create_series(&self, series: NewSeries) -> Result<SeriesModel, AppError> {
        let model = SeriesModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            round_id: series.round_id,
            home_team_id: series.home_team_id,
            away_team_id: series.away_team_id,
            home_team_wins: 0,
            away_team_wins: 0,
            games_played: 0,
            winning_team_id: None,
            completed: false,
            start_date: series.start_date,
            end_date: None,
        };
        self.series.write().await.insert(model.id, model.clone());

        debug!(series_id = model.id, "Series created in memory");
        Ok(model)
    }

    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesModel>, AppError> {
        Ok(self.series.read().await.get(&series_id).cloned())
    }

    async fn list_series(&self, round_id: Option<i64>) -> Result<Vec<SeriesModel>, AppError> {
        let mut series: Vec<SeriesModel> = self
            .series
            .read()
            .await
            .values()
            .filter(|s| round_id.map_or(true, |id| s.round_id == id))
            .cloned()
            .collect();
        series.sort_by_key(|s| s.id);
        Ok(series)
    }

    #[instrument(skip(self, series), fields(series_id = series.id))]
    async fn update_series(&self, series: &SeriesModel) -> Result<(), AppError> {
        let mut all = self.series.write().await;
        if !all.contains_key(&series.id) {
            warn!("Series not found for update in memory");
            return Err(AppError::not_found("Series not found"));
        }
        all.insert(series.id, series.clone());
        Ok(())
    }
}

const SERIES_COLUMNS: &str = "id, round_id, home_team_id, away_team_id, home_team_wins, away_team_wins, games_played, winning_team_id, completed, start_date, end_date";

fn series_from_row(row: &PgRow) -> SeriesModel {
    SeriesModel {
        id: row.get("id"),
        round_id: row.get("round_id"),
        home_team_id: row.get("home_team_id"),
        away_team_id: row.get("away_team_id"),
        home_team_wins: row.get("home_team_wins"),
        away_team_wins: row.get("away_team_wins"),
        games_played: row.get("games_played"),
        winning_team_id: row.get("winning_team_id"),
        completed: row.get("completed"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

/// PostgreSQL implementation of series repository
pub struct PostgresSeriesRepository {
    pool: PgPool,
}

impl PostgresSeriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeriesRepository for PostgresSeriesRepository {
    #[instrument(skip(self, series), fields(round_id = series.round_id))]
    async fn create_series(&self, series: NewSeries) -> Result<SeriesModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO series (round_id, home_team_id, away_team_id, start_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {SERIES_COLUMNS}"
        ))
        .bind(series.round_id)
        .bind(series.home_team_id)
        .bind(series.away_team_id)
        .bind(series.start_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create series in database");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(series_from_row(&row))
    }

    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {SERIES_COLUMNS} FROM series WHERE id = $1"))
            .bind(series_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| series_from_row(&row)))
    }

    async fn list_series(&self, round_id: Option<i64>) -> Result<Vec<SeriesModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE ($1::BIGINT IS NULL OR round_id = $1) ORDER BY id"
        ))
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(series_from_row).collect())
    }

    #[instrument(skip(self, series), fields(series_id = series.id))]
    async fn update_series(&self, series: &SeriesModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE series SET home_team_wins = $2, away_team_wins = $3, games_played = $4,
                 winning_team_id = $5, completed = $6, start_date = $7, end_date = $8
             WHERE id = $1",
        )
        .bind(series.id)
        .bind(series.home_team_wins)
        .bind(series.away_team_wins)
        .bind(series.games_played)
        .bind(series.winning_team_id)
        .bind(series.completed)
        .bind(series.start_date)
        .bind(series.end_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update series in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Series not found"));
        }
        Ok(())
    }
}
