//! Integration tests for the games API.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

async fn create_game(app: axum::Router) -> serde_json::Value {
    let (status, json) = common::post_json(
        app,
        "/api/v1/games",
        &json!({ "player_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

fn click(at: casebook_core::geometry::Point) -> serde_json::Value {
    json!({ "kind": "click", "x": at.x, "y": at.y })
}

#[tokio::test]
async fn test_new_game_starts_on_course_map() {
    let app = common::build_test_app();

    let json = create_game(app).await;

    assert!(json["game_id"].is_string());
    assert_eq!(json["screen"]["screen"], "picking_session");
    assert!(json["overlay"].is_null());
    assert_eq!(json["progress"]["scene"], 0.0);
    assert!(!json["frame"]["ops"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_click_on_session_marker_opens_level_map() {
    let app = common::build_test_app();
    let game = create_game(app.clone()).await;
    let game_id = game["game_id"].as_str().unwrap();
    let marker = common::fixture().session_marker(0);

    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/games/{game_id}/input"),
        &click(marker),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["screen"]["screen"], "picking_level");
    assert_eq!(json["screen"]["session"], 0);

    let (status, json) =
        common::get_json(app, &format!("/api/v1/games/{game_id}/frame")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["screen"]["screen"], "picking_level");
}

#[tokio::test]
async fn test_locked_session_click_changes_nothing() {
    let app = common::build_test_app();
    let game = create_game(app.clone()).await;
    let game_id = game["game_id"].as_str().unwrap();
    let marker = common::fixture().session_marker(1);

    let (status, json) = common::post_json(
        app,
        &format!("/api/v1/games/{game_id}/input"),
        &click(marker),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["screen"]["screen"], "picking_session");
    assert!(json["overlay"].is_null());
}

#[tokio::test]
async fn test_menu_opens_from_key_and_closes_with_escape() {
    let app = common::build_test_app();
    let game = create_game(app.clone()).await;
    let game_id = game["game_id"].as_str().unwrap();
    let uri = format!("/api/v1/games/{game_id}/input");
    let menu = casebook_core::geometry::Point::new(1225.0, 30.0);

    let (_, json) = common::post_json(app.clone(), &uri, &click(menu)).await;
    assert_eq!(json["overlay"]["overlay"], "menu");
    assert_eq!(json["frame"]["frozen"], true);

    let (_, json) =
        common::post_json(app, &uri, &json!({ "kind": "key", "key": "escape" })).await;
    assert!(json["overlay"].is_null());
    assert_eq!(json["frame"]["frozen"], false);
}

#[tokio::test]
async fn test_refused_user_agent_returns_403() {
    let app = common::build_test_app();

    let (status, json) = common::post_json_as(
        app,
        "/api/v1/games",
        &json!({ "player_id": Uuid::new_v4() }),
        Some("Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1)"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "client_refused");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_unknown_game_returns_404() {
    let app = common::build_test_app();
    let game_id = Uuid::new_v4();

    let (status, json) =
        common::get_json(app, &format!("/api/v1/games/{game_id}/frame")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");
}

#[tokio::test]
async fn test_malformed_input_is_rejected() {
    let app = common::build_test_app();
    let game = create_game(app.clone()).await;
    let game_id = game["game_id"].as_str().unwrap();

    let (status, _) = common::post_json(
        app,
        &format!("/api/v1/games/{game_id}/input"),
        &json!({ "kind": "wiggle" }),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_deleted_game_is_gone() {
    let app = common::build_test_app();
    let game = create_game(app.clone()).await;
    let game_id = game["game_id"].as_str().unwrap();

    let (status, json) = common::delete(app.clone(), &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(json.is_null());

    let (status, json) =
        common::get_json(app, &format!("/api/v1/games/{game_id}/frame")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");
}

#[tokio::test]
async fn test_delete_unknown_game_returns_404() {
    let app = common::build_test_app();
    let game_id = Uuid::new_v4();

    let (status, json) = common::delete(app, &format!("/api/v1/games/{game_id}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");
}

#[tokio::test]
async fn test_idle_game_is_dropped_when_next_game_starts() {
    let app = common::build_test_app_with_idle_timeout(Duration::ZERO);
    let first = create_game(app.clone()).await;
    let first_id = first["game_id"].as_str().unwrap();

    let second = create_game(app.clone()).await;
    let second_id = second["game_id"].as_str().unwrap();

    let (status, _) =
        common::get_json(app.clone(), &format!("/api/v1/games/{first_id}/frame")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) =
        common::get_json(app, &format!("/api/v1/games/{second_id}/frame")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_active_games_survive_default_idle_timeout() {
    let app = common::build_test_app();
    let first = create_game(app.clone()).await;
    let first_id = first["game_id"].as_str().unwrap();

    create_game(app.clone()).await;

    let (status, _) = common::get_json(app, &format!("/api/v1/games/{first_id}/frame")).await;
    assert_eq!(status, StatusCode::OK);
}
