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

async fn create_event(app: &Router, token: &str, name: &str, team_ids: &[&str]) -> String {
    let sport_id = first_sport_id(app, token).await;
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/events",
        &json!({
            "name": name,
            "sportId": sport_id,
            "eventDate": "2026-09-12",
            "eventTime": "14:30:00",
            "location": "Main Ground",
            "eventType": "friendly",
            "teamIds": team_ids
        }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["id"].as_str().unwrap_or_default().to_string()
}

async fn set_status(app: &Router, token: &str, event_id: &str, status_to: &str) -> StatusCode {
    let (status, _body) = common::patch_json_with_auth(
        app,
        &format!("/api/v1/events/{event_id}"),
        &json!({ "status": status_to }),
        token,
    )
    .await;
    status
}

async fn event_team_ids(app: &Router, token: &str, event_id: &str) -> Vec<String> {
    let (status, body) =
        common::get_with_auth(app, &format!("/api/v1/events/{event_id}/teams"), token).await;
    assert_eq!(status, StatusCode::OK, "get event teams failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    json["teamIds"]
        .as_array()
        .unwrap_or(&empty)
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}

// ──────────────────────────────────────────────────────────────────────────────
// Create flow
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_event_requires_a_team() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let sport_id = first_sport_id(&app, &admin).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/events",
        &json!({
            "name": "No Teams",
            "sportId": sport_id,
            "eventDate": "2026-09-12",
            "eventTime": "14:30:00",
            "location": "Main Ground",
            "eventType": "friendly",
            "teamIds": []
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_event_starts_scheduled() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Opening Team").await;
    let event = create_event(&app, &admin, "Season Opener", &[&team]).await;

    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/events/{event}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "scheduled");
    assert_eq!(json["teamNames"][0], "Opening Team");
    assert!(json["sportName"].is_string());
}

#[tokio::test]
async fn failed_create_leaves_no_orphan_event() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let sport_id = first_sport_id(&app, &admin).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/events",
        &json!({
            "name": "Ghost Event",
            "sportId": sport_id,
            "eventDate": "2026-09-12",
            "eventTime": "14:30:00",
            "location": "Nowhere",
            "eventType": "friendly",
            "teamIds": ["99999999-0000-4000-8000-000000000000"]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = common::get_with_auth(&app, "/api/v1/events", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let events = json.as_array().unwrap_or(&empty);
    assert!(events.iter().all(|e| e["name"] != "Ghost Event"));
}

#[tokio::test]
async fn create_event_invalid_type_returns_400() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let sport_id = first_sport_id(&app, &admin).await;
    let team = create_team(&app, &admin, "Typed Team").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/events",
        &json!({
            "name": "Bad Type",
            "sportId": sport_id,
            "eventDate": "2026-09-12",
            "eventTime": "14:30:00",
            "location": "Main Ground",
            "eventType": "scrimmage",
            "teamIds": [team]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ──────────────────────────────────────────────────────────────────────────────
// Status workflow
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_moves_forward_through_the_workflow() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Workflow Team").await;
    let event = create_event(&app, &admin, "Workflow", &[&team]).await;

    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);
    assert_eq!(set_status(&app, &admin, &event, "completed").await, StatusCode::OK);
}

#[tokio::test]
async fn status_cannot_skip_or_reverse() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Strict Team").await;
    let event = create_event(&app, &admin, "Strict", &[&team]).await;

    // Skipping ongoing
    assert_eq!(
        set_status(&app, &admin, &event, "completed").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );

    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);
    // Reversing
    assert_eq!(
        set_status(&app, &admin, &event, "scheduled").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn cancelled_event_is_frozen() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Frozen Team").await;
    let event = create_event(&app, &admin, "Frozen", &[&team]).await;

    assert_eq!(set_status(&app, &admin, &event, "cancelled").await, StatusCode::OK);
    assert_eq!(
        set_status(&app, &admin, &event, "ongoing").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    // Re-asserting the current status is a no-op, not an error
    assert_eq!(set_status(&app, &admin, &event, "cancelled").await, StatusCode::OK);
}

#[tokio::test]
async fn unknown_status_returns_400() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Unknown Status Team").await;
    let event = create_event(&app, &admin, "Unknown Status", &[&team]).await;

    assert_eq!(
        set_status(&app, &admin, &event, "paused").await,
        StatusCode::BAD_REQUEST
    );
}

// ──────────────────────────────────────────────────────────────────────────────
// Team assignment and player selection
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_event_teams_replaces_exactly() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team_a = create_team(&app, &admin, "Cup A").await;
    let team_b = create_team(&app, &admin, "Cup B").await;
    let team_c = create_team(&app, &admin, "Cup C").await;
    let event = create_event(&app, &admin, "Cup Final", &[&team_a]).await;

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/teams"),
        &json!({ "teamIds": [team_b.clone(), team_c.clone()] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "replace failed: {body}");

    let mut ids = event_team_ids(&app, &admin, &event).await;
    ids.sort();
    let mut expected = vec![team_b, team_c];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn team_assignment_round_trip_from_a_fresh_sport() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    // Full chain: new sport, team in that sport, event with that team.
    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/sports",
        &json!({ "name": "Korfball", "category": "team" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create sport failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let sport_id = json["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/teams",
        &json!({
            "name": "Korfball First",
            "sportId": sport_id.clone(),
            "gender": "mixed",
            "foundedYear": 2026
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create team failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let team = json["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/events",
        &json!({
            "name": "Korfball Opener",
            "sportId": sport_id,
            "eventDate": "2026-10-03",
            "eventTime": "10:00:00",
            "location": "Sports Hall",
            "eventType": "friendly",
            "teamIds": [team.clone()]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let event = json["id"].as_str().unwrap_or_default().to_string();

    assert_eq!(event_team_ids(&app, &admin, &event).await, vec![team]);

    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/teams"),
        &json!({ "teamIds": [] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(event_team_ids(&app, &admin, &event).await.is_empty());
}

#[tokio::test]
async fn player_selection_requires_assigned_teams() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Selection Team").await;
    let event = create_event(&app, &admin, "Selection", &[&team]).await;

    // Clear the assignment, then try to select players
    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/teams"),
        &json!({ "teamIds": [] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/players"),
        &json!({ "playerIds": [] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn select_players_for_event() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Squad Team").await;
    let event = create_event(&app, &admin, "Squad Match", &[&team]).await;

    let user_id =
        common::create_user(&app, &admin, "squad@example.com", "Squad Player", "player", None)
            .await;
    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/players",
        &json!({ "userId": user_id, "teamIds": [team] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create player failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let player = json["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/players"),
        &json!({ "playerIds": [player.clone()] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "select failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["playerIds"][0], player.as_str());
}

// ──────────────────────────────────────────────────────────────────────────────
// Performances
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn performances_rejected_while_scheduled() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Early Team").await;
    let event = create_event(&app, &admin, "Too Early", &[&team]).await;

    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({ "performances": [{ "teamId": team, "score": 3.0 }] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn performance_rows_must_name_exactly_one_subject() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "XOR Team").await;
    let event = create_event(&app, &admin, "XOR Match", &[&team]).await;
    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);

    // Neither subject
    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({ "performances": [{ "score": 1.0 }] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Both subjects
    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({
            "performances": [{
                "teamId": team,
                "playerId": "99999999-0000-4000-8000-000000000000",
                "score": 1.0
            }]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn recording_performances_completes_an_ongoing_event() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Result Team").await;
    let event = create_event(&app, &admin, "Result Match", &[&team]).await;
    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({
            "performances": [{
                "teamId": team,
                "score": 2.0,
                "position": 1,
                "metrics": { "possession": 61 }
            }]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "record failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let rows = json.as_array().unwrap_or(&empty);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["metrics"]["possession"], 61);

    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/events/{event}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "completed");
}

#[tokio::test]
async fn clearing_performances_leaves_an_ongoing_event_ongoing() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team = create_team(&app, &admin, "Still Playing").await;
    let event = create_event(&app, &admin, "Still Playing Match", &[&team]).await;
    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);

    // An empty rebuild records nothing, so it must not complete the event.
    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({ "performances": [] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "clear failed: {body}");

    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/events/{event}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "ongoing");
}

#[tokio::test]
async fn resubmitting_performances_rebuilds_the_set() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;
    let team_a = create_team(&app, &admin, "Rebuild A").await;
    let team_b = create_team(&app, &admin, "Rebuild B").await;
    let event = create_event(&app, &admin, "Rebuild Match", &[&team_a, &team_b]).await;
    assert_eq!(set_status(&app, &admin, &event, "ongoing").await, StatusCode::OK);

    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({
            "performances": [
                { "teamId": team_a, "score": 1.0 },
                { "teamId": team_b.clone(), "score": 1.0 }
            ]
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A corrected single-row resubmission replaces both rows
    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/events/{event}/performances"),
        &json!({ "performances": [{ "teamId": team_b, "score": 4.0 }] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "rebuild failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let rows = json.as_array().unwrap_or(&empty);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["score"], 4.0);
}
