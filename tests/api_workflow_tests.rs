use axum::http::StatusCode;
use serde_json::json;

mod utils;

use utils::*;

#[tokio::test]
async fn test_magic_link_sign_in_flow() {
    let setup = TestSetupBuilder::new().build();

    let response = setup
        .post(
            "/api/auth/magic-link",
            None,
            json!({ "email": "Fan@Example.com", "name": "Fan" }),
        )
        .await
        .ok();
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("fan@example.com"));

    let link_token = setup.link_token_for("fan@example.com").await;
    let verified = setup
        .post("/api/auth/verify", None, json!({ "token": link_token }))
        .await
        .ok();
    assert_eq!(verified["user"]["email"], "fan@example.com");
    assert_eq!(verified["user"]["isAdmin"], false);

    let bearer = verified["token"].as_str().unwrap();
    let me = setup.get("/api/auth/me", Some(bearer)).await.ok();
    assert_eq!(me["name"], "Fan");

    // Links are single use
    setup
        .post("/api/auth/verify", None, json!({ "token": link_token }))
        .await
        .error(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_link_and_bad_bearer_are_unauthorized() {
    let setup = TestSetupBuilder::new().build();

    setup
        .post("/api/auth/verify", None, json!({ "token": "not-a-token" }))
        .await
        .error(StatusCode::UNAUTHORIZED);
    setup
        .get("/api/auth/me", Some("garbage"))
        .await
        .error(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_configured_admin_email_gets_admin_access() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;
    let fan = setup.sign_in("fan@example.com", "Fan").await;

    let users = setup.get("/api/admin/users", Some(&admin)).await.ok();
    assert_eq!(users.as_array().unwrap().len(), 2);

    setup
        .get("/api/admin/users", Some(&fan))
        .await
        .error(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_seeding_is_repeatable() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;

    let first = setup
        .post("/api/admin/teams/seed", Some(&admin), json!({}))
        .await
        .ok();
    assert_eq!(first["created"], 32);

    let second = setup
        .post("/api/admin/teams/seed", Some(&admin), json!({}))
        .await
        .ok();
    assert_eq!(second["created"], 0);
    assert_eq!(second["skipped"], 32);
}

#[tokio::test]
async fn test_team_validation() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;

    let created = setup
        .post(
            "/api/admin/teams",
            Some(&admin),
            json!({
                "name": "Quebec Nordiques",
                "shortCode": "que",
                "conference": "eastern",
                "division": "atlantic"
            }),
        )
        .await
        .created();
    assert_eq!(created["shortCode"], "QUE");

    setup
        .post(
            "/api/admin/teams",
            Some(&admin),
            json!({
                "name": "Quebec Again",
                "shortCode": "QUE",
                "conference": "eastern",
                "division": "atlantic"
            }),
        )
        .await
        .error(StatusCode::CONFLICT);

    setup
        .post(
            "/api/admin/teams",
            Some(&admin),
            json!({
                "name": "Misplaced",
                "shortCode": "MIS",
                "conference": "eastern",
                "division": "pacific"
            }),
        )
        .await
        .error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_round_with_matchups_creates_series() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;
    let teams = setup.seed_league(&admin).await;

    let series_ids = setup
        .open_round(
            &admin,
            "2025",
            1,
            &[(teams["DAL"], teams["COL"]), (teams["WPG"], teams["STL"])],
        )
        .await;
    assert_eq!(series_ids.len(), 2);

    let rounds = setup.get("/api/rounds?season=2025", None).await.ok();
    let round_id = rounds[0]["id"].as_i64().unwrap();
    let series = setup
        .get(&format!("/api/series?roundId={round_id}"), None)
        .await
        .ok();
    assert_eq!(series.as_array().unwrap().len(), 2);
    assert_eq!(series[0]["completed"], false);
    assert_eq!(series[0]["gamesPlayed"], 0);
}

#[tokio::test]
async fn test_prediction_lifecycle() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;
    let fan = setup.sign_in("fan@example.com", "Fan").await;
    let teams = setup.seed_league(&admin).await;
    let (dal, col) = (teams["DAL"], teams["COL"]);
    let series_id = setup.open_round(&admin, "2025", 1, &[(dal, col)]).await[0];

    // NoPrediction -> Predicted
    let first = setup.predict(&fan, series_id, dal, 5).await.created();
    assert_eq!(first["state"], "predicted");

    // Predicted -> Predicted
    let second = setup.predict(&fan, series_id, col, 7).await.created();
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["predictedWinnerId"], col);

    // Invalid picks
    setup
        .predict(&fan, series_id, teams["TOR"], 6)
        .await
        .error(StatusCode::BAD_REQUEST);
    setup
        .predict(&fan, series_id, dal, 3)
        .await
        .error(StatusCode::BAD_REQUEST);
    setup
        .predict(&fan, 999, dal, 6)
        .await
        .error(StatusCode::NOT_FOUND);

    // Predicted -> Locked
    setup.report_series(&admin, series_id, 2, 4).await.ok();
    let mine = setup.get("/api/predictions/me", Some(&fan)).await.ok();
    assert_eq!(mine[0]["locked"], true);
    assert_eq!(mine[0]["state"], "locked");

    let message = setup
        .predict(&fan, series_id, dal, 6)
        .await
        .error(StatusCode::BAD_REQUEST);
    assert!(message.contains("completed"));
}

#[tokio::test]
async fn test_series_result_validation_over_http() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;
    let fan = setup.sign_in("fan@example.com", "Fan").await;
    let teams = setup.seed_league(&admin).await;
    let series_id = setup
        .open_round(&admin, "2025", 1, &[(teams["DAL"], teams["COL"])])
        .await[0];

    setup
        .report_series(&fan, series_id, 1, 0)
        .await
        .error(StatusCode::FORBIDDEN);
    setup
        .report_series(&admin, series_id, 5, 1)
        .await
        .error(StatusCode::BAD_REQUEST);
    setup
        .put(
            &format!("/api/series/{series_id}"),
            Some(&admin),
            json!({ "homeTeamWins": 2, "awayTeamWins": 2, "gamesPlayed": 5 }),
        )
        .await
        .error(StatusCode::BAD_REQUEST);
    setup
        .put(
            &format!("/api/series/{series_id}"),
            Some(&admin),
            json!({ "homeTeamWins": 3, "awayTeamWins": 2, "gamesPlayed": 5, "completed": true }),
        )
        .await
        .error(StatusCode::BAD_REQUEST);
    setup
        .report_series(&admin, 404, 1, 0)
        .await
        .error(StatusCode::NOT_FOUND);

    let series = setup.report_series(&admin, series_id, 3, 2).await.ok();
    assert_eq!(series["completed"], false);
    assert!(series["winningTeamId"].is_null());
    assert!(series["endDate"].is_null());
}

#[tokio::test]
async fn test_pool_config_round_trip() {
    let setup = TestSetupBuilder::new().build();
    let admin = setup.sign_in_admin().await;

    let defaults = setup
        .get("/api/admin/config?season=2025", Some(&admin))
        .await
        .ok();
    assert_eq!(defaults["allowLatePredictions"], false);
    assert_eq!(defaults["pointsForCorrectWinner"], 1);
    assert_eq!(defaults["pointsForCorrectGames"], 2);
    assert_eq!(defaults["pointsForChampionGames"], 2);

    setup
        .put(
            "/api/admin/config",
            Some(&admin),
            json!({
                "season": "2025",
                "allowLatePredictions": true,
                "pointsForCorrectWinner": 2,
                "pointsForCorrectGames": 3,
                "pointsForFinalistTeam": 1,
                "pointsForChampion": 1,
                "pointsForChampionGames": 2
            }),
        )
        .await
        .ok();

    let stored = setup.get("/api/admin/config", Some(&admin)).await.ok();
    assert_eq!(stored["allowLatePredictions"], true);
    assert_eq!(stored["pointsForCorrectGames"], 3);
}
