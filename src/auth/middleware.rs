use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::repository::UserRepository;
use super::types::AuthClaims;
use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates the Authorization Bearer header and adds AuthClaims to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<AuthClaims>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    // Tokens outlive deleted accounts, so the user must still exist
    if state.user_repository.get_user(claims.sub).await?.is_none() {
        warn!(user_id = claims.sub, "Token refers to unknown user");
        return Err(AppError::Unauthorized("User no longer exists".to_string()));
    }

    debug!(user_id = claims.sub, is_admin = claims.is_admin, "Authentication successful");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Rejects requests whose claims lack the admin flag.
/// Must run after `jwt_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req.extensions().get::<AuthClaims>().ok_or_else(|| {
        warn!("Admin check ran without authenticated claims");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    if !claims.is_admin {
        warn!(user_id = claims.sub, uri = %req.uri(), "Non-admin attempted admin route");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}
