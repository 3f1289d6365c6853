mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_and_list_committee_members() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let user_id =
        common::create_user(&app, &admin, "pres@example.com", "The President", "committee", None)
            .await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/committee",
        &json!({ "userId": user_id, "position": "president", "startDate": "2026-01-01" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = json["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(json["position"], "president");
    assert_eq!(json["name"], "The President");
    assert_eq!(json["email"], "pres@example.com");
    assert!(json["endDate"].is_null());

    let (status, body) = common::get_with_auth(&app, "/api/v1/committee", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let empty = vec![];
    let members = json.as_array().unwrap_or(&empty);
    assert!(members.iter().any(|m| m["id"] == id.as_str()));
}

#[tokio::test]
async fn create_member_invalid_position_returns_400() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let user_id =
        common::create_user(&app, &admin, "badpos@example.com", "Bad Position", "committee", None)
            .await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/committee",
        &json!({ "userId": user_id, "position": "chancellor" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_member_unknown_user_returns_400() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        "/api/v1/committee",
        &json!({
            "userId": "99999999-0000-4000-8000-000000000000",
            "position": "secretary"
        }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn end_a_tenure() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let user_id =
        common::create_user(&app, &admin, "tenure@example.com", "Tenured", "committee", None)
            .await;
    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/committee",
        &json!({ "userId": user_id, "position": "treasurer" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = json["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/committee/{id}"),
        &json!({ "endDate": "2026-12-31", "isActive": false }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "patch failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["endDate"], "2026-12-31");
    assert_eq!(json["isActive"], false);
}

#[tokio::test]
async fn delete_member() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    let user_id =
        common::create_user(&app, &admin, "exmem@example.com", "Ex Member", "committee", None)
            .await;
    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/committee",
        &json!({ "userId": user_id, "position": "executive" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = json["id"].as_str().unwrap_or_default().to_string();

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/committee/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/committee/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn committee_management_is_admin_only() {
    let app = common::test_app().await;
    let admin = common::admin_token(&app).await;

    common::create_user(
        &app,
        &admin,
        "cmember@example.com",
        "Committee Member",
        "committee",
        Some("password-123"),
    )
    .await;
    let token = common::signin(&app, "cmember@example.com", "password-123").await;

    // Being on the committee role does not grant committee-record management
    let (status, _body) = common::get_with_auth(&app, "/api/v1/committee", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
