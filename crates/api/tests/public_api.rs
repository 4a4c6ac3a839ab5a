//! Integration tests for the unauthenticated read surface.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{body_json, create_media, get, post, post_json, put, upload};
use serde_json::json;

async fn publish(app: &common::TestApp, id: i64) {
    let admin = app.admin();
    let response = post(app, &format!("/api/v1/media/{id}/publish"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn slugs(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn drafts_are_not_public() {
    let app = common::build_test_app();
    create_media(&app, "Work In Progress").await;

    let response = get(&app, "/api/v1/public/media", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);

    let response = get(&app, "/api/v1/public/media/work-in-progress", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn published_item_hides_workflow_fields() {
    let app = common::build_test_app();
    let id = create_media(&app, "Field Guide").await;
    publish(&app, id).await;

    let response = get(&app, "/api/v1/public/media/field-guide", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Field Guide");
    assert_eq!(json["data"]["body"], "Body");
    assert!(json["data"]["status"].is_null());
    assert!(json["data"]["created_by"].is_null());
    assert_eq!(json["data"]["assets"], json!([]));
    assert_eq!(json["data"]["terms"], json!([]));
}

#[tokio::test]
async fn private_items_stay_hidden_after_publication() {
    let app = common::build_test_app();
    let editor = app.editor();
    let response = post_json(
        &app,
        "/api/v1/media",
        Some(&editor),
        json!({"title": "Internal Memo", "content_type": "report", "visibility": "private"}),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    publish(&app, id).await;

    let response = get(&app, "/api/v1/public/media/internal-memo", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/v1/public/media", None).await;
    assert_eq!(body_json(response).await["total"], 0);
}

#[tokio::test]
async fn scheduled_item_appears_once_its_time_passes() {
    let app = common::build_test_app();
    let id = create_media(&app, "Embargoed").await;
    let editor = app.editor();
    let publish_at = common::t0() + Duration::hours(2);

    let response = post_json(
        &app,
        &format!("/api/v1/media/{id}/schedule"),
        Some(&editor),
        json!({"publish_at": publish_at.to_rfc3339()}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/public/media/embargoed", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clock.advance(Duration::hours(2));

    let response = get(&app, "/api/v1/public/media/embargoed", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/public/media", None).await;
    assert_eq!(slugs(&body_json(response).await), vec!["embargoed"]);
}

#[tokio::test]
async fn archived_items_leave_the_public_surface() {
    let app = common::build_test_app();
    let id = create_media(&app, "Retired").await;
    publish(&app, id).await;

    let admin = app.admin();
    post(&app, &format!("/api/v1/media/{id}/archive"), Some(&admin)).await;

    let response = get(&app, "/api/v1/public/media/retired", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_list_is_newest_first_and_filters_by_term() {
    let app = common::build_test_app();
    let older = create_media(&app, "Older").await;
    let newer = create_media(&app, "Newer").await;
    publish(&app, older).await;
    app.clock.advance(Duration::minutes(10));
    publish(&app, newer).await;

    let response = get(&app, "/api/v1/public/media", None).await;
    assert_eq!(slugs(&body_json(response).await), vec!["newer", "older"]);

    let editor = app.editor();
    let response = post_json(
        &app,
        "/api/v1/taxonomy",
        Some(&editor),
        json!({"kind": "domain", "label": "Payroll"}),
    )
    .await;
    let term_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let response = put(
        &app,
        &format!("/api/v1/media/{older}/taxonomy/{term_id}"),
        Some(&editor),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(&app, "/api/v1/public/media?taxonomy=payroll", None).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(slugs(&json), vec!["older"]);
}

#[tokio::test]
async fn detail_includes_assets_and_terms() {
    let app = common::build_test_app();
    let id = create_media(&app, "Illustrated").await;
    let editor = app.editor();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&editor),
        "diagram.svg",
        "image/svg+xml",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        &app,
        "/api/v1/taxonomy",
        Some(&editor),
        json!({"kind": "format", "label": "Guide"}),
    )
    .await;
    let term_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    put(&app, &format!("/api/v1/media/{id}/taxonomy/{term_id}"), Some(&editor)).await;
    publish(&app, id).await;

    let response = get(&app, "/api/v1/public/media/illustrated", None).await;
    let json = body_json(response).await;
    let assets = json["data"]["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["kind"], "image");
    assert!(assets[0]["url"].as_str().unwrap().starts_with("/files/media/"));
    assert!(assets[0]["storage_path"].is_null());
    assert_eq!(json["data"]["terms"][0]["key"], "guide");
}

#[tokio::test]
async fn approval_without_schedule_goes_live_at_approval_time() {
    let app = common::build_test_app();
    let id = create_media(&app, "Fast Track").await;
    let editor = app.editor();
    let reviewer = app.reviewer();

    post(&app, &format!("/api/v1/media/{id}/submit"), Some(&editor)).await;
    let response = post(&app, &format!("/api/v1/media/{id}/approve"), Some(&reviewer)).await;
    assert_eq!(body_json(response).await["data"]["status"], "scheduled");

    let response = get(&app, "/api/v1/public/media/fast-track", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let approved_at = body_json(response).await["data"]["published_at"].clone();
    assert_eq!(approved_at, json!(common::t0()));

    app.clock.advance(Duration::minutes(30));
    publish(&app, id).await;

    let response = get(&app, "/api/v1/public/media/fast-track", None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["published_at"], json!(common::t0() + Duration::minutes(30)));
}
