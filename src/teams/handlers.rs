use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::TeamService,
    types::{SeedResponse, TeamRequest, TeamResponse},
};
use crate::shared::{AppError, AppState};

/// GET /api/teams
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    Ok(Json(service.list_teams().await?))
}

/// GET /api/teams/:id
#[instrument(name = "get_team", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<TeamResponse>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    Ok(Json(service.get_team(team_id).await?))
}

/// POST /api/admin/teams
#[instrument(name = "create_team", skip(state, request))]
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    let team = service.create_team(request).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// PUT /api/admin/teams/:id
#[instrument(name = "update_team", skip(state, request))]
pub async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Json(request): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    Ok(Json(service.update_team(team_id, request).await?))
}

/// POST /api/admin/teams/seed
#[instrument(name = "seed_teams", skip(state))]
pub async fn seed_teams(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    Ok(Json(service.seed_league().await?))
}
