#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::TimeZone;
use http_body_util::BodyExt;
use mediahub_core::clock::ManualClock;
use mediahub_core::roles::Role;
use mediahub_core::store::memory::{InMemoryObjectStore, InMemoryStore};
use mediahub_core::types::{DbId, Timestamp};
use tower::ServiceExt;

use mediahub_api::auth::jwt::{generate_access_token, JwtConfig};
use mediahub_api::config::ServerConfig;
use mediahub_api::router::build_app_router;
use mediahub_api::state::AppState;

pub const TEST_ORIGIN: &str = "http://localhost:5173";

/// Wall-clock start for every test app.
pub fn t0() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        storage_root: std::env::temp_dir().join("mediahub-api-tests"),
        storage_public_base_url: "/files".to_string(),
        max_upload_bytes: 2 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The application router plus handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub objects: Arc<InMemoryObjectStore>,
    pub clock: Arc<ManualClock>,
    pub config: ServerConfig,
}

impl TestApp {
    /// Mint a token the way the identity provider would.
    pub fn token(&self, user_id: DbId, roles: &[Role]) -> String {
        generate_access_token(user_id, roles, &self.config.jwt).unwrap()
    }

    pub fn admin(&self) -> String {
        self.token(1, &[Role::Admin])
    }

    pub fn editor(&self) -> String {
        self.token(2, &[Role::Editor])
    }

    pub fn reviewer(&self) -> String {
        self.token(3, &[Role::Reviewer])
    }

    pub fn provider(&self) -> String {
        self.token(4, &[Role::Provider])
    }
}

/// Build the full application router with all middleware layers over
/// in-memory stores and a manual clock starting at [`t0`].
///
/// Uses the same [`build_app_router`] as production.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(InMemoryStore::new());
    let objects = Arc::new(InMemoryObjectStore::new("/files"));
    let clock = Arc::new(ManualClock::new(t0()));

    let state = AppState::new(store.clone(), objects.clone(), clock.clone(), config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        objects,
        clock,
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::GET, uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post(app: &TestApp, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::POST, uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn delete(app: &TestApp, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::DELETE, uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn put(app: &TestApp, uri: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::PUT, uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, uri, token, body).await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, token, body).await
}

/// POST a single-file multipart form with the part named `file`.
pub async fn upload(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    file_name: &str,
    mime: &str,
    data: &[u8],
) -> Response<Body> {
    const BOUNDARY: &str = "mediahub-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let req = request(Method::POST, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

/// Read the whole body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a Draft item through the API and return its id.
pub async fn create_media(app: &TestApp, title: &str) -> DbId {
    let editor = app.editor();
    let response = post_json(
        app,
        "/api/v1/media",
        Some(&editor),
        serde_json::json!({ "title": title, "content_type": "article", "body": "Body" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
