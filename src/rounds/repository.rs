use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewRound, RoundModel};
use crate::shared::AppError;

/// Trait for round repository operations
#[async_trait]
pub trait RoundRepository: Send + Sync {
    async fn create_round(&self, round: NewRound) -> Result<RoundModel, AppError>;
    async fn get_round(&self, round_id: i64) -> Result<Option<RoundModel>, AppError>;

    /// Rounds of one season, or all of them, ordered by season then number
    async fn list_rounds(&self, season: Option<&str>) -> Result<Vec<RoundModel>, AppError>;

    async fn update_round(&self, round: &RoundModel) -> Result<(), AppError>;
}

/// In-memory implementation of RoundRepository for development and testing
pub struct InMemoryRoundRepository {
    rounds: RwLock<HashMap<i64, RoundModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryRoundRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoundRepository {
    pub fn new() -> Self {
        Self {
            rounds: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl RoundRepository for InMemoryRoundRepository {
    #[instrument(skip(self, round), fields(season = %round.season, number = round.number))]
    async fn create_round(&self, round: NewRound) -> Result<RoundModel, AppError> {
        let model = RoundModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: round.name,
            number: round.number,
            season: round.season,
            is_active: round.is_active,
        };
        self.rounds.write().await.insert(model.id, model.clone());

        debug!(round_id = model.id, "Round created in memory");
        Ok(model)
    }

    async fn get_round(&self, round_id: i64) -> Result<Option<RoundModel>, AppError> {
        Ok(self.rounds.read().await.get(&round_id).cloned())
    }

    async fn list_rounds(&self, season: Option<&str>) -> Result<Vec<RoundModel>, AppError> {
        let mut rounds: Vec<RoundModel> = self
            .rounds
            .read()
            .await
            .values()
            .filter(|r| season.map_or(true, |s| r.season == s))
            .cloned()
            .collect();
        rounds.sort_by(|a, b| (&a.season, a.number, a.id).cmp(&(&b.season, b.number, b.id)));
        Ok(rounds)
    }

    #[instrument(skip(self, round), fields(round_id = round.id))]
    async fn update_round(&self, round: &RoundModel) -> Result<(), AppError> {
        let mut rounds = self.rounds.write().await;
        if !rounds.contains_key(&round.id) {
            warn!("Round not found for update in memory");
            return Err(AppError::not_found("Round not found"));
        }
        rounds.insert(round.id, round.clone());
        Ok(())
    }
}

const ROUND_COLUMNS: &str = "id, name, number, season, is_active";

fn round_from_row(row: &PgRow) -> RoundModel {
    RoundModel {
        id: row.get("id"),
        name: row.get("name"),
        number: row.get("number"),
        season: row.get("season"),
        is_active: row.get("is_active"),
    }
}

/// PostgreSQL implementation of round repository
pub struct PostgresRoundRepository {
    pool: PgPool,
}

impl PostgresRoundRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoundRepository for PostgresRoundRepository {
    #[instrument(skip(self, round), fields(season = %round.season, number = round.number))]
    async fn create_round(&self, round: NewRound) -> Result<RoundModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO rounds (name, number, season, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {ROUND_COLUMNS}"
        ))
        .bind(&round.name)
        .bind(round.number)
        .bind(&round.season)
        .bind(round.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create round in database");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(round_from_row(&row))
    }

    async fn get_round(&self, round_id: i64) -> Result<Option<RoundModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE id = $1"))
            .bind(round_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| round_from_row(&row)))
    }

    async fn list_rounds(&self, season: Option<&str>) -> Result<Vec<RoundModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {ROUND_COLUMNS} FROM rounds
             WHERE ($1::TEXT IS NULL OR season = $1)
             ORDER BY season, number, id"
        ))
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(round_from_row).collect())
    }

    #[instrument(skip(self, round), fields(round_id = round.id))]
    async fn update_round(&self, round: &RoundModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE rounds SET name = $2, number = $3, season = $4, is_active = $5 WHERE id = $1",
        )
        .bind(round.id)
        .bind(&round.name)
        .bind(round.number)
        .bind(&round.season)
        .bind(round.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update round in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Round not found"));
        }
        Ok(())
    }
}
