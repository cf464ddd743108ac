use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::types::{
    RoundQuery, RoundRequest, RoundResponse, RoundWithMatchupsRequest, RoundWithSeriesResponse,
};
use crate::shared::{AppError, AppState};

/// GET /api/rounds?season=
#[instrument(name = "list_rounds", skip(state))]
pub async fn list_rounds(
    State(state): State<AppState>,
    Query(query): Query<RoundQuery>,
) -> Result<Json<Vec<RoundResponse>>, AppError> {
    let rounds = state
        .round_service()
        .list_rounds(query.season.as_deref())
        .await?;
    Ok(Json(rounds.into_iter().map(RoundResponse::from).collect()))
}

/// POST /api/admin/rounds
#[instrument(name = "create_round", skip(state, request))]
pub async fn create_round(
    State(state): State<AppState>,
    Json(request): Json<RoundRequest>,
) -> Result<(StatusCode, Json<RoundResponse>), AppError> {
    let round = state.round_service().create_round(request).await?;
    Ok((StatusCode::CREATED, Json(round.into())))
}

/// PUT /api/admin/rounds/:id
#[instrument(name = "update_round", skip(state, request))]
pub async fn update_round(
    State(state): State<AppState>,
    Path(round_id): Path<i64>,
    Json(request): Json<RoundRequest>,
) -> Result<Json<RoundResponse>, AppError> {
    let round = state.round_service().update_round(round_id, request).await?;
    Ok(Json(round.into()))
}

/// POST /api/admin/rounds/with-matchups
#[instrument(name = "create_round_with_matchups", skip(state, request))]
pub async fn create_round_with_matchups(
    State(state): State<AppState>,
    Json(request): Json<RoundWithMatchupsRequest>,
) -> Result<(StatusCode, Json<RoundWithSeriesResponse>), AppError> {
    let created = state.round_service().create_with_matchups(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post, put},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/api/rounds", get(list_rounds))
            .route("/api/admin/rounds", post(create_round))
            .route("/api/admin/rounds/:id", put(update_round))
            .with_state(state)
    }

    fn post_round(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/admin/rounds")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_rounds() {
        let state = AppStateBuilder::new().build();

        let response = app(state.clone())
            .oneshot(post_round(r#"{"name": "First Round", "number": 1, "season": "2025"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        app(state.clone())
            .oneshot(post_round(r#"{"name": "First Round", "number": 1, "season": "2024"}"#))
            .await
            .unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/rounds?season=2025")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rounds: Vec<RoundResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].season, "2025");
        assert!(rounds[0].is_active);
    }

    #[tokio::test]
    async fn test_invalid_round_number() {
        let state = AppStateBuilder::new().build();
        let response = app(state)
            .oneshot(post_round(r#"{"name": "Extra", "number": 6, "season": "2025"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_round() {
        let state = AppStateBuilder::new().build();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/admin/rounds/12")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "Final", "number": 4, "season": "2025"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
