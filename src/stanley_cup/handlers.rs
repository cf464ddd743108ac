use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::instrument;

use super::types::{
    CupPredictionRequest, CupPredictionResponse, CupResultRequest, CupResultResponse,
    CupResultSummary, CupSeasonQuery,
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// POST /api/stanley-cup/predictions
#[instrument(name = "submit_cup_prediction", skip(state, claims, request))]
pub async fn submit_cup_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<CupPredictionRequest>,
) -> Result<Json<CupPredictionResponse>, AppError> {
    Ok(Json(state.cup_service().submit(&claims, request).await?))
}

/// GET /api/stanley-cup/predictions/me?season=
#[instrument(name = "my_cup_prediction", skip(state, claims))]
pub async fn my_cup_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Query(query): Query<CupSeasonQuery>,
) -> Result<Json<Option<CupPredictionResponse>>, AppError> {
    Ok(Json(
        state
            .cup_service()
            .my_prediction(claims.user_id(), query.season)
            .await?,
    ))
}

/// POST /api/stanley-cup/results
#[instrument(name = "record_cup_results", skip(state, request))]
pub async fn record_cup_results(
    State(state): State<AppState>,
    Json(request): Json<CupResultRequest>,
) -> Result<Json<CupResultSummary>, AppError> {
    Ok(Json(state.cup_service().record_results(request).await?))
}

/// GET /api/stanley-cup/results/:season
#[instrument(name = "get_cup_results", skip(state))]
pub async fn get_cup_results(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<CupResultResponse>, AppError> {
    Ok(Json(state.cup_service().get_results(&season).await?))
}
