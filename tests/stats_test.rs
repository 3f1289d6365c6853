mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::json;

async fn first_sport_id(app: &Router, token: &str) -> String {
    let (status, body) = common::get_with_auth(app, "/api/v1/sports", token).await;
    assert_eq!(status, StatusCode::OK, "sports list failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json[0]["id"].as_str().unwrap_or_default().to_string()
}

/// Create a team and set its counters in one go; returns the team id.
async fn team_with_record(
    app: &Router,
    token: &str,
    name: &str,
    wins: i32,
    losses: i32,
    draws: i32,
) -> String {
    let sport_id = first_sport_id(app, token).await;
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/teams",
        &json!({ "name": name, "sportId": sport_id, "gender": "mixed", "foundedYear": 2020 }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create team failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = json["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::patch_json_with_auth(
        app,
        &format!("/api/v1/teams/{id}"),
        &json!({ "wins": wins, "losses": losses, "draws": draws }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "set record failed: {body}");
    id
}

// ──────────────────────────────────────────────────────────────────────────────
// GET /api/v1/stats/overview
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn overview_uses_summed_totals_not_averaged_rates() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    // 100% over 10 matches and 0% over 1 match. Summed: 10/11 = 91%.
    // An average of the two per-team rates would claim 50%.
    team_with_record(&app, &admin, "Juggernauts", 10, 0, 0).await;
    team_with_record(&app, &admin, "Strugglers", 0, 1, 0).await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/overview", &admin).await;
    assert_eq!(status, StatusCode::OK, "overview failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["activeTeams"], 2);
    assert_eq!(json["totalWins"], 10);
    assert_eq!(json["totalLosses"], 1);
    assert_eq!(json["totalMatches"], 11);
    assert_eq!(json["overallWinRate"], 91);
}

#[tokio::test]
async fn overview_with_no_matches_reports_zero_rate() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/overview", &admin).await;
    assert_eq!(status, StatusCode::OK, "overview failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["activeTeams"], 0);
    assert_eq!(json["overallWinRate"], 0);
    // The seeded admin is the only user
    assert_eq!(json["activeUsers"], 1);
}

#[tokio::test]
async fn overview_counts_events_by_status() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let team = team_with_record(&app, &admin, "Event Counters", 0, 0, 0).await;
    let sport_id = first_sport_id(&app, &admin).await;

    for name in ["First Fixture", "Second Fixture"] {
        let (status, body) = common::post_json_with_auth(
            &app,
            "/api/v1/events",
            &json!({
                "name": name,
                "sportId": sport_id,
                "eventDate": "2026-10-01",
                "eventTime": "10:00:00",
                "location": "Ground",
                "eventType": "league",
                "teamIds": [team]
            }),
            &admin,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
    }

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/overview", &admin).await;
    assert_eq!(status, StatusCode::OK, "overview failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["scheduledEvents"], 2);
    assert_eq!(json["completedEvents"], 0);
}

// ──────────────────────────────────────────────────────────────────────────────
// GET /api/v1/stats/teams
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rankings_are_descending_by_win_rate() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    team_with_record(&app, &admin, "Middling", 1, 1, 0).await; // 50%
    team_with_record(&app, &admin, "Top", 3, 1, 0).await; // 75%
    team_with_record(&app, &admin, "Bottom", 1, 3, 0).await; // 25%

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/teams", &admin).await;
    assert_eq!(status, StatusCode::OK, "rankings failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json[0]["name"], "Top");
    assert_eq!(json[0]["rank"], 1);
    assert_eq!(json[0]["winRate"], 75);
    assert_eq!(json[1]["name"], "Middling");
    assert_eq!(json[2]["name"], "Bottom");
}

#[tokio::test]
async fn ranking_ties_keep_creation_order() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    // Both 50%, very different match counts. No secondary tie-break: the
    // earlier-created team stays first.
    team_with_record(&app, &admin, "Old Guard", 1, 1, 0).await;
    team_with_record(&app, &admin, "New Blood", 10, 10, 0).await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/teams", &admin).await;
    assert_eq!(status, StatusCode::OK, "rankings failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json[0]["name"], "Old Guard");
    assert_eq!(json[1]["name"], "New Blood");
    assert_eq!(json[0]["winRate"], 50);
    assert_eq!(json[1]["winRate"], 50);
}

#[tokio::test]
async fn win_rate_rounds_half_up() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    // 1 win in 8 matches: 12.5% rounds to 13
    team_with_record(&app, &admin, "Rounders", 1, 7, 0).await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/stats/teams", &admin).await;
    assert_eq!(status, StatusCode::OK, "rankings failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json[0]["winRate"], 13);
    assert_eq!(json[0]["matches"], 8);
}
