//! Integration tests for the character and scene library endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, tiny_png_uri};
use serde_json::json;

fn character_payload(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "imageUrl": tiny_png_uri(),
        "style": "Realistic",
        "gender": "female",
        "age": "25",
        "outfit": "rain coat",
        "expression": "smiling",
    })
}

#[tokio::test]
async fn create_then_list_characters() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let response = post_json(app.clone(), "/api/v1/characters", character_payload("Alice")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Alice");
    assert!(created["id"].is_string());

    let response = get(app, "/api/v1/characters").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["imageUrl"], tiny_png_uri());
}

#[tokio::test]
async fn get_character_by_id_and_missing_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let created =
        body_json(post_json(app.clone(), "/api/v1/characters", character_payload("Alice")).await)
            .await;
    let id = created["id"].as_str().unwrap();

    let response = get(app.clone(), &format!("/api/v1/characters/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        app,
        "/api/v1/characters/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_character_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let response = post_json(app, "/api/v1/characters", character_payload("  ")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_character_rejects_non_data_uri_portrait() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let mut payload = character_payload("Alice");
    payload["imageUrl"] = json!("https://example.com/alice.png");
    let response = post_json(app, "/api/v1/characters", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_character_returns_204_then_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let created =
        body_json(post_json(app.clone(), "/api/v1/characters", character_payload("Alice")).await)
            .await;
    let id = created["id"].as_str().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/characters/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app, &format!("/api/v1/characters/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_referenced_character_leaves_the_scene_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let created =
        body_json(post_json(app.clone(), "/api/v1/characters", character_payload("Alice")).await)
            .await;
    let character_id = created["id"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/scenes",
        json!({
            "imageUrl": tiny_png_uri(),
            "prompt": "a rooftop garden at dusk",
            "characterIds": [character_id],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete(app.clone(), &format!("/api/v1/characters/{character_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The scene keeps its (now dangling) reference.
    let scenes = body_json(get(app, "/api/v1/scenes").await).await;
    assert_eq!(scenes["data"][0]["characterIds"], json!([character_id]));
}

#[tokio::test]
async fn scenes_list_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    for prompt in ["first scene", "second scene"] {
        let response = post_json(
            app.clone(),
            "/api/v1/scenes",
            json!({
                "imageUrl": tiny_png_uri(),
                "prompt": prompt,
                "characterIds": [],
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let scenes = body_json(get(app, "/api/v1/scenes").await).await;
    assert_eq!(scenes["data"][0]["prompt"], "second scene");
    assert_eq!(scenes["data"][1]["prompt"], "first scene");
}

#[tokio::test]
async fn create_scene_rejects_empty_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let response = post_json(
        app,
        "/api/v1/scenes",
        json!({
            "imageUrl": tiny_png_uri(),
            "prompt": "   ",
            "characterIds": [],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_scene_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(common::test_config(dir.path(), &common::no_stub())).await;

    let created = body_json(
        post_json(
            app.clone(),
            "/api/v1/scenes",
            json!({
                "imageUrl": tiny_png_uri(),
                "prompt": "a quiet library",
                "characterIds": [],
            }),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/scenes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let scenes = body_json(get(app, "/api/v1/scenes").await).await;
    assert!(scenes["data"].as_array().unwrap().is_empty());
}
