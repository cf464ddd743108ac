use axum::{
    body::Body,
    http::{Method, Request},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt; // for `oneshot`

use cup_pool::{app_router, notify::Notification};

use super::assertions::{id_of, TestResponse};
use super::setup::{TestSetup, ADMIN_EMAIL};

// ============================================================================
// Request helpers
// ============================================================================

impl TestSetup {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }
}

// ============================================================================
// Workflow actions
// ============================================================================

impl TestSetup {
    /// Token from the most recent magic link mailed to `email`
    pub async fn link_token_for(&self, email: &str) -> String {
        match self.outbox.last_for(email).await {
            Some(Notification::MagicLink { link, .. }) => link
                .split("token=")
                .nth(1)
                .unwrap_or_else(|| panic!("link without token: {link}"))
                .to_string(),
            None => panic!("no magic link sent to {email}"),
        }
    }

    /// Runs the magic-link flow and returns the bearer token
    pub async fn sign_in(&self, email: &str, name: &str) -> String {
        self.post(
            "/api/auth/magic-link",
            None,
            json!({ "email": email, "name": name }),
        )
        .await
        .ok();

        let link_token = self.link_token_for(email).await;
        let verified = self
            .post("/api/auth/verify", None, json!({ "token": link_token }))
            .await
            .ok();
        verified["token"].as_str().unwrap().to_string()
    }

    pub async fn sign_in_admin(&self) -> String {
        self.sign_in(ADMIN_EMAIL, "Commissioner").await
    }

    /// Seeds the league and returns team ids by short code
    pub async fn seed_league(&self, admin: &str) -> HashMap<String, i64> {
        self.post("/api/admin/teams/seed", Some(admin), json!({}))
            .await
            .ok();
        let teams = self.get("/api/teams", None).await.ok();
        teams
            .as_array()
            .unwrap()
            .iter()
            .map(|t| (t["shortCode"].as_str().unwrap().to_string(), id_of(t)))
            .collect()
    }

    /// Creates a round with the given (home, away) matchups and returns the series ids
    pub async fn open_round(
        &self,
        admin: &str,
        season: &str,
        number: i32,
        matchups: &[(i64, i64)],
    ) -> Vec<i64> {
        let matchups: Vec<Value> = matchups
            .iter()
            .map(|(home, away)| json!({ "homeTeamId": home, "awayTeamId": away }))
            .collect();
        let created = self
            .post(
                "/api/admin/rounds/with-matchups",
                Some(admin),
                json!({
                    "name": format!("Round {number}"),
                    "number": number,
                    "season": season,
                    "matchups": matchups,
                }),
            )
            .await
            .created();
        created["series"].as_array().unwrap().iter().map(id_of).collect()
    }

    pub async fn predict(&self, token: &str, series_id: i64, winner: i64, games: i32) -> TestResponse {
        self.post(
            "/api/predictions",
            Some(token),
            json!({
                "seriesId": series_id,
                "predictedWinnerId": winner,
                "predictedGames": games,
            }),
        )
        .await
    }

    pub async fn report_series(
        &self,
        admin: &str,
        series_id: i64,
        home_wins: i32,
        away_wins: i32,
    ) -> TestResponse {
        self.put(
            &format!("/api/series/{series_id}"),
            Some(admin),
            json!({
                "homeTeamWins": home_wins,
                "awayTeamWins": away_wins,
                "gamesPlayed": home_wins + away_wins,
                "completed": false,
            }),
        )
        .await
    }

    /// Points of the caller's prediction on a series
    pub async fn my_points(&self, token: &str, series_id: i64) -> i64 {
        let mine = self.get("/api/predictions/me", Some(token)).await.ok();
        mine.as_array()
            .unwrap()
            .iter()
            .find(|p| p["seriesId"] == series_id)
            .and_then(|p| p["points"].as_i64())
            .unwrap_or_else(|| panic!("no prediction on series {series_id}"))
    }
}
