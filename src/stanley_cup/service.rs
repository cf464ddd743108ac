use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{CupPick, CupResultModel},
    repository::CupRepository,
    types::{
        CupPredictionRequest, CupPredictionResponse, CupResultRequest, CupResultResponse,
        CupResultSummary,
    },
};
use crate::auth::AuthClaims;
use crate::predictions::models::SERIES_LENGTH;
use crate::scoring::ScoringService;
use crate::shared::AppError;
use crate::teams::models::{Conference, TeamModel};
use crate::teams::repository::TeamRepository;

/// Service for Stanley Cup picks and the season final
pub struct CupService {
    cup_repository: Arc<dyn CupRepository>,
    team_repository: Arc<dyn TeamRepository>,
    scoring: ScoringService,
    default_season: String,
}

impl CupService {
    pub fn new(
        cup_repository: Arc<dyn CupRepository>,
        team_repository: Arc<dyn TeamRepository>,
        scoring: ScoringService,
        default_season: String,
    ) -> Self {
        Self {
            cup_repository,
            team_repository,
            scoring,
            default_season,
        }
    }

    fn season_or_default(&self, season: Option<String>) -> String {
        season
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_season.clone())
    }

    /// Loads a finalist and checks it plays in the expected conference
    async fn finalist(&self, team_id: i64, conference: Conference) -> Result<TeamModel, AppError> {
        let team = self
            .team_repository
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Team {team_id} not found")))?;
        if team.conference != conference {
            return Err(AppError::validation(format!(
                "{} is not in the {conference} conference",
                team.name
            )));
        }
        Ok(team)
    }

    async fn validate_final(
        &self,
        east_team_id: i64,
        west_team_id: i64,
        winner_team_id: i64,
        games: i32,
    ) -> Result<(), AppError> {
        if !SERIES_LENGTH.contains(&games) {
            return Err(AppError::validation(format!(
                "Games must be between {} and {}",
                SERIES_LENGTH.start(),
                SERIES_LENGTH.end()
            )));
        }
        self.finalist(east_team_id, Conference::Eastern).await?;
        self.finalist(west_team_id, Conference::Western).await?;
        if winner_team_id != east_team_id && winner_team_id != west_team_id {
            return Err(AppError::validation(
                "Champion must be one of the two finalists",
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, actor, request), fields(actor = actor.sub))]
    pub async fn submit(
        &self,
        actor: &AuthClaims,
        request: CupPredictionRequest,
    ) -> Result<CupPredictionResponse, AppError> {
        let season = self.season_or_default(request.season);
        self.validate_final(
            request.east_team_id,
            request.west_team_id,
            request.winner_team_id,
            request.predicted_games,
        )
        .await?;

        let result = self.cup_repository.get_result(&season).await?;
        if result.is_some() && !actor.is_admin {
            return Err(AppError::validation(format!(
                "Stanley Cup results for {season} are in; predictions are locked"
            )));
        }

        let mut prediction = self
            .cup_repository
            .upsert_prediction(CupPick {
                user_id: actor.user_id(),
                season: season.clone(),
                east_team_id: request.east_team_id,
                west_team_id: request.west_team_id,
                winner_team_id: request.winner_team_id,
                predicted_games: request.predicted_games,
            })
            .await?;

        if let Some(result) = &result {
            self.scoring.score_cup(result).await?;
            if let Some(rescored) = self
                .cup_repository
                .find_prediction(prediction.user_id, &season)
                .await?
            {
                prediction = rescored;
            }
        }

        info!(prediction_id = prediction.id, %season, "Stanley Cup prediction saved");
        Ok(CupPredictionResponse::new(prediction, result.is_some()))
    }

    pub async fn my_prediction(
        &self,
        user_id: i64,
        season: Option<String>,
    ) -> Result<Option<CupPredictionResponse>, AppError> {
        let season = self.season_or_default(season);
        let locked = self.cup_repository.get_result(&season).await?.is_some();
        Ok(self
            .cup_repository
            .find_prediction(user_id, &season)
            .await?
            .map(|p| CupPredictionResponse::new(p, locked)))
    }

    /// Stores the final and scores every pick of the season
    #[instrument(skip(self, request), fields(season = %request.season))]
    pub async fn record_results(
        &self,
        request: CupResultRequest,
    ) -> Result<CupResultSummary, AppError> {
        let season = request.season.trim().to_string();
        if season.is_empty() {
            return Err(AppError::validation("Season is required"));
        }
        self.validate_final(
            request.east_team_id,
            request.west_team_id,
            request.winning_team_id,
            request.games_played,
        )
        .await?;

        let result = CupResultModel {
            season,
            east_team_id: request.east_team_id,
            west_team_id: request.west_team_id,
            winning_team_id: request.winning_team_id,
            games_played: request.games_played,
            recorded_at: Utc::now(),
        };
        self.cup_repository.save_result(&result).await?;
        let summary = self.scoring.score_cup(&result).await?;

        Ok(CupResultSummary {
            result: result.into(),
            summary,
        })
    }

    pub async fn get_results(&self, season: &str) -> Result<CupResultResponse, AppError> {
        self.cup_repository
            .get_result(season)
            .await?
            .map(CupResultResponse::from)
            .ok_or_else(|| AppError::not_found(format!("No Stanley Cup results for {season}")))
    }
}
