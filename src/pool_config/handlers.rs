use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use super::types::{PoolConfigPayload, SeasonQuery};
use crate::shared::{AppError, AppState};

/// GET /api/admin/config?season=
/// Returns the stored settings, or the defaults for an unconfigured season
#[instrument(name = "get_pool_config", skip(state))]
pub async fn get_config(
    State(state): State<AppState>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<PoolConfigPayload>, AppError> {
    let config = state.pool_config_service().get_config(query.season).await?;
    Ok(Json(config.into()))
}

/// PUT /api/admin/config
#[instrument(name = "update_pool_config", skip(state, payload), fields(season = %payload.season))]
pub async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<PoolConfigPayload>,
) -> Result<Json<PoolConfigPayload>, AppError> {
    let config = state.pool_config_service().update_config(payload).await?;
    Ok(Json(config.into()))
}
