//! Integration tests for asset upload/delete and taxonomy management.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, create_media, delete, get, post_json, put, send, upload};
use mediahub_core::asset::sha256_hex;
use serde_json::json;

/// 1x1 RGBA PNG.
const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

async fn create_term(app: &common::TestApp, kind: &str, label: &str) -> i64 {
    let editor = app.editor();
    let response = post_json(
        app,
        "/api/v1/taxonomy",
        Some(&editor),
        json!({"kind": kind, "label": label}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_image_records_metadata() {
    let app = common::build_test_app();
    let id = create_media(&app, "With Cover").await;
    let editor = app.editor();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&editor),
        "cover image.png",
        "image/png",
        PNG_1X1,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["media_id"], id);
    assert_eq!(json["data"]["kind"], "image");
    assert_eq!(json["data"]["mime_type"], "image/png");
    assert_eq!(json["data"]["byte_size"], PNG_1X1.len());
    assert_eq!(json["data"]["checksum"], sha256_hex(PNG_1X1));
    assert_eq!(json["data"]["uploaded_by"], 2);

    let path = json["data"]["storage_path"].as_str().unwrap();
    assert!(path.starts_with(&format!("media/{id}/")));
    assert!(path.ends_with("-cover_image.png"));
    assert_eq!(json["data"]["public_url"], format!("/files/{path}"));

    assert_eq!(app.objects.object_count().await, 1);
    let (bytes, mime) = app.objects.get(path).await.unwrap();
    assert_eq!(bytes, PNG_1X1);
    assert_eq!(mime, "image/png");

    let response = get(&app, &format!("/api/v1/media/{id}/assets"), Some(&editor)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_image_upload_is_a_doc() {
    let app = common::build_test_app();
    let id = create_media(&app, "Annual Report").await;
    let provider = app.provider();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&provider),
        "report.pdf",
        "application/pdf",
        b"%PDF-1.7 minimal",
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "doc");
    assert!(json["data"]["width"].is_null());
}

#[tokio::test]
async fn reviewer_cannot_upload() {
    let app = common::build_test_app();
    let id = create_media(&app, "Locked Down").await;
    let reviewer = app.reviewer();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&reviewer),
        "x.png",
        "image/png",
        PNG_1X1,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.objects.object_count().await, 0);
}

#[tokio::test]
async fn upload_without_file_field_is_400() {
    let app = common::build_test_app();
    let id = create_media(&app, "Empty Form").await;
    let editor = app.editor();

    let boundary = "mediahub-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/media/{id}/assets"))
        .header(header::AUTHORIZATION, format!("Bearer {editor}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing required 'file' field");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let app = common::build_test_app();
    let id = create_media(&app, "Zero Bytes").await;
    let editor = app.editor();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&editor),
        "empty.txt",
        "text/plain",
        b"",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.objects.object_count().await, 0);
}

#[tokio::test]
async fn upload_to_missing_media_is_404() {
    let app = common::build_test_app();
    let editor = app.editor();

    let response = upload(&app, "/api/v1/media/4242/assets", Some(&editor), "a.png", "image/png", PNG_1X1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_asset_removes_object_and_record() {
    let app = common::build_test_app();
    let id = create_media(&app, "Short Lived").await;
    let editor = app.editor();

    let response = upload(
        &app,
        &format!("/api/v1/media/{id}/assets"),
        Some(&editor),
        "clip.mp4",
        "video/mp4",
        b"not really a video",
    )
    .await;
    let asset_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete(&app, &format!("/api/v1/assets/{asset_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.objects.object_count().await, 0);

    let response = get(&app, &format!("/api/v1/media/{id}/assets"), Some(&editor)).await;
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = delete(&app, &format!("/api/v1/assets/{asset_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn term_creation_is_admin_or_editor() {
    let app = common::build_test_app();

    for token in [app.reviewer(), app.provider()] {
        let response = post_json(
            &app,
            "/api/v1/taxonomy",
            Some(&token),
            json!({"kind": "tag", "label": "Onboarding"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let admin = app.admin();
    let response = post_json(
        &app,
        "/api/v1/taxonomy",
        Some(&admin),
        json!({"kind": "tag", "label": "Onboarding", "key": "onboarding-2026"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["key"], "onboarding-2026");
    assert_eq!(json["data"]["kind"], "tag");
}

#[tokio::test]
async fn duplicate_term_is_409() {
    let app = common::build_test_app();
    create_term(&app, "stage", "Draft Review").await;

    let editor = app.editor();
    let response = post_json(
        &app,
        "/api/v1/taxonomy",
        Some(&editor),
        json!({"kind": "stage", "label": "Draft Review"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same key under another kind is a different term.
    create_term(&app, "tag", "Draft Review").await;
}

#[tokio::test]
async fn list_terms_filters_by_kind() {
    let app = common::build_test_app();
    create_term(&app, "domain", "Payroll").await;
    create_term(&app, "domain", "Benefits").await;
    create_term(&app, "format", "Video").await;
    let reviewer = app.reviewer();

    let response = get(&app, "/api/v1/taxonomy?kind=domain", Some(&reviewer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Benefits", "Payroll"]);

    let response = get(&app, "/api/v1/taxonomy", Some(&reviewer)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn attach_is_idempotent_and_detach_is_not() {
    let app = common::build_test_app();
    let id = create_media(&app, "Tagged").await;
    let term_id = create_term(&app, "tag", "Howto").await;
    let editor = app.editor();
    let uri = format!("/api/v1/media/{id}/taxonomy/{term_id}");

    let response = put(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["key"], "howto");

    let response = put(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &format!("/api/v1/media/{id}/taxonomy"), Some(&editor)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = delete(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn attach_unknown_term_is_404() {
    let app = common::build_test_app();
    let id = create_media(&app, "Lonely").await;
    let editor = app.editor();

    let response = put(&app, &format!("/api/v1/media/{id}/taxonomy/777"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_list_filters_by_taxonomy_key() {
    let app = common::build_test_app();
    let tagged = create_media(&app, "Tagged Item").await;
    create_media(&app, "Untagged Item").await;
    let term_id = create_term(&app, "domain", "Compliance").await;
    let editor = app.editor();
    put(&app, &format!("/api/v1/media/{tagged}/taxonomy/{term_id}"), Some(&editor)).await;

    let response = get(&app, "/api/v1/media?taxonomy=compliance", Some(&editor)).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], tagged);
}
