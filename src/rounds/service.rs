use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{NewRound, RoundModel, ROUND_NUMBERS},
    repository::RoundRepository,
    types::{RoundRequest, RoundWithMatchupsRequest, RoundWithSeriesResponse},
};
use crate::series::models::NewSeries;
use crate::series::repository::SeriesRepository;
use crate::series::types::SeriesResponse;
use crate::series::validate_matchup;
use crate::shared::AppError;
use crate::teams::repository::TeamRepository;

/// Service for playoff rounds
pub struct RoundService {
    round_repository: Arc<dyn RoundRepository>,
    series_repository: Arc<dyn SeriesRepository>,
    team_repository: Arc<dyn TeamRepository>,
}

impl RoundService {
    pub fn new(
        round_repository: Arc<dyn RoundRepository>,
        series_repository: Arc<dyn SeriesRepository>,
        team_repository: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            round_repository,
            series_repository,
            team_repository,
        }
    }

    pub async fn list_rounds(&self, season: Option<&str>) -> Result<Vec<RoundModel>, AppError> {
        self.round_repository.list_rounds(season).await
    }

    #[instrument(skip(self, request), fields(season = %request.season, number = request.number))]
    pub async fn create_round(&self, request: RoundRequest) -> Result<RoundModel, AppError> {
        let is_active = request.is_active.unwrap_or(true);
        let round = self
            .round_repository
            .create_round(validate(request.name, request.number, request.season, is_active)?)
            .await?;
        info!(round_id = round.id, "Round created");
        Ok(round)
    }

    #[instrument(skip(self, request))]
    pub async fn update_round(
        &self,
        round_id: i64,
        request: RoundRequest,
    ) -> Result<RoundModel, AppError> {
        let existing = self
            .round_repository
            .get_round(round_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Round {round_id} not found")))?;

        let is_active = request.is_active.unwrap_or(existing.is_active);
        let fields = validate(request.name, request.number, request.season, is_active)?;
        let updated = RoundModel {
            id: existing.id,
            name: fields.name,
            number: fields.number,
            season: fields.season,
            is_active: fields.is_active,
        };
        self.round_repository.update_round(&updated).await?;
        info!(round_id, "Round updated");
        Ok(updated)
    }

    /// Creates a round and one series per matchup.
    ///
    /// All matchups are checked before anything is written.
    #[instrument(skip(self, request), fields(season = %request.season, matchups = request.matchups.len()))]
    pub async fn create_with_matchups(
        &self,
        request: RoundWithMatchupsRequest,
    ) -> Result<RoundWithSeriesResponse, AppError> {
        let new_round = validate(request.name, request.number, request.season, true)?;
        if request.matchups.is_empty() {
            return Err(AppError::validation("At least one matchup is required"));
        }

        let mut seen = HashSet::new();
        for matchup in &request.matchups {
            validate_matchup(
                self.team_repository.as_ref(),
                matchup.home_team_id,
                matchup.away_team_id,
            )
            .await?;
            for team_id in [matchup.home_team_id, matchup.away_team_id] {
                if !seen.insert(team_id) {
                    return Err(AppError::validation(format!(
                        "Team {team_id} appears in more than one matchup"
                    )));
                }
            }
        }

        let round = self.round_repository.create_round(new_round).await?;
        let mut series: Vec<SeriesResponse> = Vec::with_capacity(request.matchups.len());
        for matchup in request.matchups {
            let created = self
                .series_repository
                .create_series(NewSeries {
                    round_id: round.id,
                    home_team_id: matchup.home_team_id,
                    away_team_id: matchup.away_team_id,
                    start_date: matchup.start_date,
                })
                .await?;
            series.push(created.into());
        }

        info!(round_id = round.id, series = series.len(), "Round created with matchups");
        Ok(RoundWithSeriesResponse {
            round: round.into(),
            series,
        })
    }
}

fn validate(name: String, number: i32, season: String, is_active: bool) -> Result<NewRound, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Round name is required"));
    }
    if !ROUND_NUMBERS.contains(&number) {
        return Err(AppError::validation(format!(
            "Round number must be between {} and {}",
            ROUND_NUMBERS.start(),
            ROUND_NUMBERS.end()
        )));
    }
    let season = season.trim().to_string();
    if season.is_empty() {
        return Err(AppError::validation("Season is required"));
    }
    Ok(NewRound {
        name,
        number,
        season,
        is_active,
    })
}
