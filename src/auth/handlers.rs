use axum::{extract::State, Extension, Json};
use tracing::{info, instrument};

use super::types::{
    AuthClaims, AuthResponse, MagicLinkRequest, MagicLinkResponse, UserResponse, VerifyRequest,
};
use crate::shared::{AppError, AppState};

/// HTTP handler for requesting a sign-in link
///
/// POST /api/auth/magic-link
#[instrument(name = "request_magic_link", skip(state, request))]
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>, AppError> {
    let response = state.auth_service().request_magic_link(request).await?;
    Ok(Json(response))
}

/// HTTP handler for exchanging a link token for a bearer token
///
/// POST /api/auth/verify
#[instrument(name = "verify_magic_link", skip(state, request))]
pub async fn verify_magic_link(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth_service().verify_magic_link(&request.token).await?;
    info!(user_id = response.user.id, "Bearer token issued");
    Ok(Json(response))
}

/// GET /api/auth/me
#[instrument(name = "current_user", skip(state, claims), fields(user_id = claims.sub))]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth_service().current_user(claims.user_id()).await?;
    Ok(Json(user))
}

/// GET /api/admin/users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.auth_service().list_users().await?;
    Ok(Json(users))
}
