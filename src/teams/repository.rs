use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{Conference, Division, NewTeam, TeamModel};
use crate::shared::AppError;

/// Trait for team repository operations
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create_team(&self, team: NewTeam) -> Result<TeamModel, AppError>;
    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError>;
    async fn find_by_code(&self, short_code: &str) -> Result<Option<TeamModel>, AppError>;
    async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError>;
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError>;
}

/// In-memory implementation of TeamRepository for development and testing
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<i64, TeamModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, team), fields(short_code = %team.short_code))]
    async fn create_team(&self, team: NewTeam) -> Result<TeamModel, AppError> {
        let mut teams = self.teams.write().await;
        if teams.values().any(|t| t.short_code == team.short_code) {
            warn!("Team short code already exists in memory");
            return Err(AppError::Conflict(format!(
                "Team {} already exists",
                team.short_code
            )));
        }

        let model = TeamModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: team.name,
            short_code: team.short_code,
            conference: team.conference,
            division: team.division,
            logo_url: team.logo_url,
            is_active: true,
        };
        teams.insert(model.id, model.clone());

        debug!(team_id = model.id, "Team created in memory");
        Ok(model)
    }

    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError> {
        Ok(self.teams.read().await.get(&team_id).cloned())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<TeamModel>, AppError> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .find(|t| t.short_code == short_code)
            .cloned())
    }

    async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError> {
        let mut teams: Vec<TeamModel> = self.teams.read().await.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    #[instrument(skip(self, team), fields(team_id = team.id))]
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError> {
        let mut teams = self.teams.write().await;
        if !teams.contains_key(&team.id) {
            return Err(AppError::not_found("Team not found"));
        }
        if teams
            .values()
            .any(|t| t.id != team.id && t.short_code == team.short_code)
        {
            return Err(AppError::Conflict(format!(
                "Team {} already exists",
                team.short_code
            )));
        }
        teams.insert(team.id, team.clone());
        Ok(())
    }
}

fn team_from_row(row: &PgRow) -> Result<TeamModel, AppError> {
    let conference: String = row.get("conference");
    let division: String = row.get("division");
    Ok(TeamModel {
        id: row.get("id"),
        name: row.get("name"),
        short_code: row.get("short_code"),
        conference: Conference::from_str(&conference)
            .map_err(|_| AppError::DatabaseError(format!("Unknown conference {conference}")))?,
        division: Division::from_str(&division)
            .map_err(|_| AppError::DatabaseError(format!("Unknown division {division}")))?,
        logo_url: row.get("logo_url"),
        is_active: row.get("is_active"),
    })
}

const TEAM_COLUMNS: &str = "id, name, short_code, conference, division, logo_url, is_active";

/// PostgreSQL implementation of team repository
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    #[instrument(skip(self, team), fields(short_code = %team.short_code))]
    async fn create_team(&self, team: NewTeam) -> Result<TeamModel, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO teams (name, short_code, conference, division, logo_url, is_active)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             ON CONFLICT (short_code) DO NOTHING
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(&team.name)
        .bind(&team.short_code)
        .bind(team.conference.to_string())
        .bind(team.division.to_string())
        .bind(&team.logo_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create team in database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => team_from_row(&row),
            None => Err(AppError::Conflict(format!(
                "Team {} already exists",
                team.short_code
            ))),
        }
    }

    async fn get_team(&self, team_id: i64) -> Result<Option<TeamModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(team_from_row).transpose()
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<TeamModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE short_code = $1"
        ))
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(team_from_row).transpose()
    }

    async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError> {
        let rows = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(team_from_row).collect()
    }

    #[instrument(skip(self, team), fields(team_id = team.id))]
    async fn update_team(&self, team: &TeamModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE teams SET name = $2, short_code = $3, conference = $4, division = $5,
             logo_url = $6, is_active = $7 WHERE id = $1",
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.short_code)
        .bind(team.conference.to_string())
        .bind(team.division.to_string())
        .bind(&team.logo_url)
        .bind(team.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Team {} already exists", team.short_code))
            }
            _ => AppError::DatabaseError(e.to_string()),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Team not found"));
        }
        Ok(())
    }
}
