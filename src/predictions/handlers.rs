use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use super::types::{
    LeaderboardResponse, OverridePointsRequest, PredictionResponse, SubmitPredictionRequest,
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// POST /api/predictions
#[instrument(name = "submit_prediction", skip(state, claims, request))]
pub async fn submit_prediction(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<SubmitPredictionRequest>,
) -> Result<(StatusCode, Json<PredictionResponse>), AppError> {
    let prediction = state.prediction_service().submit(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(prediction)))
}

/// GET /api/predictions/me
#[instrument(name = "my_predictions", skip(state, claims))]
pub async fn my_predictions(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<Vec<PredictionResponse>>, AppError> {
    Ok(Json(
        state
            .prediction_service()
            .list_for_user(claims.user_id())
            .await?,
    ))
}

/// GET /api/predictions/leaderboard
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    Ok(Json(state.prediction_service().leaderboard().await?))
}

/// GET /api/admin/series/:id/predictions
#[instrument(name = "series_predictions", skip(state))]
pub async fn series_predictions(
    State(state): State<AppState>,
    Path(series_id): Path<i64>,
) -> Result<Json<Vec<PredictionResponse>>, AppError> {
    Ok(Json(
        state
            .prediction_service()
            .list_for_series(series_id)
            .await?,
    ))
}

/// PUT /api/admin/predictions/:id/points
#[instrument(name = "override_points", skip(state, request))]
pub async fn override_points(
    State(state): State<AppState>,
    Path(prediction_id): Path<i64>,
    Json(request): Json<OverridePointsRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    Ok(Json(
        state
            .prediction_service()
            .override_points(prediction_id, request.points)
            .await?,
    ))
}
