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

async fn create_team(app: &Router, token: &str, name: &str) -> String {
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
    json["id"].as_str().unwrap_or_default().to_string()
}

/// Fixture: a coach signed in, holding one team with one active player and
/// one scheduled event. Returns (`coach_token`, `team_id`).
async fn coached_setup(app: &Router, admin: &str) -> (String, String) {
    let coach_id = common::create_user(
        app,
        admin,
        "mycoach@example.com",
        "My Coach",
        "coach",
        Some("password-123"),
    )
    .await;
    let team = create_team(app, admin, "Coached Squad").await;

    let (status, _body) = common::put_json_with_auth(
        app,
        &format!("/api/v1/users/{coach_id}/teams"),
        &json!({ "teamIds": [team.clone()] }),
        admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let user_id =
        common::create_user(app, admin, "squadie@example.com", "Squadie", "player", None).await;
    let (status, _body) = common::post_json_with_auth(
        app,
        "/api/v1/players",
        &json!({ "userId": user_id, "teamIds": [team.clone()] }),
        admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let sport_id = first_sport_id(app, admin).await;
    let (status, _body) = common::post_json_with_auth(
        app,
        "/api/v1/events",
        &json!({
            "name": "Coached Fixture",
            "sportId": sport_id,
            "eventDate": "2026-11-20",
            "eventTime": "18:00:00",
            "location": "Away Ground",
            "eventType": "league",
            "teamIds": [team.clone()]
        }),
        admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = common::signin(app, "mycoach@example.com", "password-123").await;
    (token, team)
}

#[tokio::test]
async fn coach_sees_own_teams_with_roster_counts() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let (token, team) = coached_setup(&app, &admin).await;

    // A second team the coach does not hold
    create_team(&app, &admin, "Someone Elses Squad").await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/coach/teams", &token).await;
    assert_eq!(status, StatusCode::OK, "coach teams failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let teams = json.as_array().unwrap_or(&empty);
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["id"], team.as_str());
    assert_eq!(teams[0]["activePlayerCount"], 1);
}

#[tokio::test]
async fn coach_sees_rostered_players() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let (token, team) = coached_setup(&app, &admin).await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/coach/players", &token).await;
    assert_eq!(status, StatusCode::OK, "coach players failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let players = json.as_array().unwrap_or(&empty);
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["email"], "squadie@example.com");
    assert_eq!(players[0]["teamIds"][0], team.as_str());
}

#[tokio::test]
async fn coach_sees_events_involving_their_teams() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let (token, _team) = coached_setup(&app, &admin).await;

    // An event for an unrelated team must not show up
    let other = create_team(&app, &admin, "Unrelated").await;
    let sport_id = first_sport_id(&app, &admin).await;
    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/events",
        &json!({
            "name": "Unrelated Fixture",
            "sportId": sport_id,
            "eventDate": "2026-11-21",
            "eventTime": "12:00:00",
            "location": "Elsewhere",
            "eventType": "friendly",
            "teamIds": [other]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::get_with_auth(&app, "/api/v1/coach/events", &token).await;
    assert_eq!(status, StatusCode::OK, "coach events failed: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let events = json.as_array().unwrap_or(&empty);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "Coached Fixture");
}

#[tokio::test]
async fn coach_routes_reject_other_roles() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let (status, _body) = common::get_with_auth(&app, "/api/v1/coach/teams", &admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
