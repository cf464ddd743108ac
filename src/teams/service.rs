use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{NewTeam, TeamModel},
    repository::TeamRepository,
    seed,
    types::{SeedResponse, TeamRequest, TeamResponse},
};
use crate::shared::AppError;

/// Service for team reference data
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
}

impl TeamService {
    pub fn new(repository: Arc<dyn TeamRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_teams(&self) -> Result<Vec<TeamResponse>, AppError> {
        Ok(self
            .repository
            .list_teams()
            .await?
            .into_iter()
            .map(TeamResponse::from)
            .collect())
    }

    pub async fn get_team(&self, team_id: i64) -> Result<TeamResponse, AppError> {
        self.repository
            .get_team(team_id)
            .await?
            .map(TeamResponse::from)
            .ok_or_else(|| AppError::not_found(format!("Team {team_id} not found")))
    }

    #[instrument(skip(self, request), fields(short_code = %request.short_code))]
    pub async fn create_team(&self, request: TeamRequest) -> Result<TeamResponse, AppError> {
        let new_team = validate(request)?;
        let team = self.repository.create_team(new_team).await?;
        info!(team_id = team.id, "Team created");
        Ok(team.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update_team(
        &self,
        team_id: i64,
        request: TeamRequest,
    ) -> Result<TeamResponse, AppError> {
        let existing = self
            .repository
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Team {team_id} not found")))?;

        let is_active = request.is_active.unwrap_or(existing.is_active);
        let fields = validate(request)?;
        let updated = TeamModel {
            id: existing.id,
            name: fields.name,
            short_code: fields.short_code,
            conference: fields.conference,
            division: fields.division,
            logo_url: fields.logo_url,
            is_active,
        };

        self.repository.update_team(&updated).await?;
        info!(team_id, "Team updated");
        Ok(updated.into())
    }

    /// Inserts the league's teams, leaving existing short codes untouched
    #[instrument(skip(self))]
    pub async fn seed_league(&self) -> Result<SeedResponse, AppError> {
        let mut created = 0;
        let mut skipped = 0;

        for team in seed::nhl_teams() {
            if self.repository.find_by_code(&team.short_code).await?.is_some() {
                debug!(short_code = %team.short_code, "Team already present, skipping");
                skipped += 1;
                continue;
            }
            self.repository.create_team(team).await?;
            created += 1;
        }

        info!(created, skipped, "League seeded");
        Ok(SeedResponse { created, skipped })
    }
}

fn validate(request: TeamRequest) -> Result<NewTeam, AppError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Team name is required"));
    }

    let short_code = request.short_code.trim().to_uppercase();
    if !(2..=4).contains(&short_code.len()) || !short_code.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(AppError::validation(
            "Short code must be 2 to 4 letters",
        ));
    }

    if request.division.conference() != request.conference {
        return Err(AppError::validation(format!(
            "Division {} is not part of the {} conference",
            request.division, request.conference
        )));
    }

    Ok(NewTeam {
        name,
        short_code,
        conference: request.conference,
        division: request.division,
        logo_url: request.logo_url.filter(|url| !url.trim().is_empty()),
    })
}
