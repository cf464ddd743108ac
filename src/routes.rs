use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::shared::AppState;
use crate::{auth, pool_config, predictions, rounds, series, stanley_cup, teams};

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Browser access is limited to the frontend origin
fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = match HeaderValue::from_str(state.config.app_base_url.trim_end_matches('/')) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(app_base_url = %state.config.app_base_url, "Invalid APP_BASE_URL, allowing any origin");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// The complete JSON API
pub fn app_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/magic-link", post(auth::request_magic_link))
        .route("/api/auth/verify", post(auth::verify_magic_link))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/teams/:id", get(teams::get_team))
        .route("/api/rounds", get(rounds::list_rounds))
        .route("/api/series", get(series::list_series))
        .route("/api/series/:id", get(series::get_series))
        .route("/api/predictions/leaderboard", get(predictions::leaderboard))
        .route(
            "/api/stanley-cup/results/:season",
            get(stanley_cup::get_cup_results),
        );

    let authed = Router::new()
        .route("/api/auth/me", get(auth::current_user))
        .route("/api/predictions", post(predictions::submit_prediction))
        .route("/api/predictions/me", get(predictions::my_predictions))
        .route(
            "/api/stanley-cup/predictions",
            post(stanley_cup::submit_cup_prediction),
        )
        .route(
            "/api/stanley-cup/predictions/me",
            get(stanley_cup::my_cup_prediction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth));

    let admin = Router::new()
        .route("/api/admin/users", get(auth::list_users))
        .route("/api/admin/teams", post(teams::create_team))
        .route("/api/admin/teams/seed", post(teams::seed_teams))
        .route("/api/admin/teams/:id", put(teams::update_team))
        .route("/api/admin/rounds", post(rounds::create_round))
        .route(
            "/api/admin/rounds/with-matchups",
            post(rounds::create_round_with_matchups),
        )
        .route("/api/admin/rounds/:id", put(rounds::update_round))
        .route("/api/admin/series", post(series::create_series))
        .route("/api/series/:id", put(series::update_series))
        .route("/api/admin/series/:id/rescore", post(series::rescore_series))
        .route(
            "/api/admin/series/:id/predictions",
            get(predictions::series_predictions),
        )
        .route(
            "/api/admin/predictions/:id/points",
            put(predictions::override_points),
        )
        .route(
            "/api/stanley-cup/results",
            post(stanley_cup::record_cup_results),
        )
        .route(
            "/api/admin/config",
            get(pool_config::get_config).put(pool_config::update_config),
        )
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth));

    Router::new()
        .merge(public)
        .merge(authed)
        .merge(admin)
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
