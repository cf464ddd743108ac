use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{
    models::NewSeries,
    types::{CreateSeriesRequest, SeriesQuery, SeriesResponse, UpdateSeriesRequest},
};
use crate::scoring::ScoringSummary;
use crate::shared::{AppError, AppState};

/// GET /api/series?roundId=
#[instrument(name = "list_series", skip(state))]
pub async fn list_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<SeriesResponse>>, AppError> {
    let series = state.series_service().list_series(query.round_id).await?;
    Ok(Json(series.into_iter().map(SeriesResponse::from).collect()))
}

/// GET /api/series/:id
#[instrument(name = "get_series", skip(state))]
pub async fn get_series(
    State(state): State<AppState>,
    Path(series_id): Path<i64>,
) -> Result<Json<SeriesResponse>, AppError> {
    let series = state.series_service().get_series(series_id).await?;
    Ok(Json(series.into()))
}

/// POST /api/admin/series
#[instrument(name = "create_series", skip(state, request))]
pub async fn create_series(
    State(state): State<AppState>,
    Json(request): Json<CreateSeriesRequest>,
) -> Result<(StatusCode, Json<SeriesResponse>), AppError> {
    let series = state
        .series_service()
        .create_series(NewSeries {
            round_id: request.round_id,
            home_team_id: request.home_team_id,
            away_team_id: request.away_team_id,
            start_date: request.start_date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(series.into())))
}

/// PUT /api/series/:id
#[instrument(name = "update_series", skip(state, request))]
pub async fn update_series(
    State(state): State<AppState>,
    Path(series_id): Path<i64>,
    Json(request): Json<UpdateSeriesRequest>,
) -> Result<Json<SeriesResponse>, AppError> {
    let series = state
        .series_service()
        .record_result(series_id, request.into())
        .await?;
    Ok(Json(series.into()))
}

/// POST /api/admin/series/:id/rescore
#[instrument(name = "rescore_series", skip(state))]
pub async fn rescore_series(
    State(state): State<AppState>,
    Path(series_id): Path<i64>,
) -> Result<Json<ScoringSummary>, AppError> {
    Ok(Json(state.series_service().rescore(series_id).await?))
}
