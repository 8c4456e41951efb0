#![allow(dead_code)]

//! Shared helpers for API integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so the
//! tests exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery) that production uses. A stub drive provider
//! (token endpoint + file API) can be spawned for drive-mode tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use axum::routing::{get as axum_get, patch, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use scenecast_api::config::ServerConfig;
use scenecast_api::router::build_app_router;
use scenecast_api::state::{AppState, LibraryState};
use scenecast_core::library::AppData;
use scenecast_core::quota::SessionQuota;
use scenecast_genai::GenAiClient;
use scenecast_store::auth::{AuthGate, OAuthConfig};
use scenecast_store::{DriveStore, LocalStore, StorageMode, Store};

/// Base64 payload of a valid 1x1 PNG, for portrait fixtures.
pub const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGIAAQAABQABDQottAAAAABJRU5ErkJggg==";

/// A valid portrait `data:` URI.
pub fn tiny_png_uri() -> String {
    format!("data:image/png;base64,{TINY_PNG_B64}")
}

/// Build a test `ServerConfig` with safe defaults.
///
/// `stub_base` is the base URL of the stub drive provider; tests that
/// never touch drive can pass an unroutable address.
pub fn test_config(data_dir: &Path, stub_base: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: data_dir.display().to_string(),
        local_quota_bytes: 64 * 1024,
        storage_mode: "local".to_string(),
        autosave_delay_secs: 3,
        genai_api_url: format!("{stub_base}/genai"),
        genai_api_key: "test-key".to_string(),
        genai_model: "test-model".to_string(),
        portrait_session_limit: 2,
        drive_api_url: format!("{stub_base}/drive"),
        drive_upload_url: format!("{stub_base}/upload"),
        oauth: OAuthConfig {
            token_url: format!("{stub_base}/token"),
            revoke_url: format!("{stub_base}/revoke"),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers from a
/// prepared config. The library starts from whatever the local backend
/// currently holds.
pub async fn build_test_app(config: ServerConfig) -> Router {
    let auth = Arc::new(AuthGate::new(config.oauth.clone()));
    let local = LocalStore::with_quota(&config.data_dir, config.local_quota_bytes);
    let drive = DriveStore::new(
        config.drive_api_url.clone(),
        config.drive_upload_url.clone(),
        Arc::clone(&auth),
    );
    let store = Arc::new(Store::new(local, drive));

    let data = store
        .load(StorageMode::Local)
        .await
        .unwrap_or_else(|_| AppData::default());

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        genai: Arc::new(GenAiClient::new(
            config.genai_api_url.clone(),
            config.genai_api_key.clone(),
            config.genai_model.clone(),
        )),
        auth,
        library: Arc::new(LibraryState::new(StorageMode::Local, data)),
        quota: Arc::new(SessionQuota::new(config.portrait_session_limit)),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    request(app, Method::PUT, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::POST, uri, None).await
}

async fn request(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Stub drive provider
// ---------------------------------------------------------------------------

const STUB_BOUNDARY: &str = "-------314159265358979323846";
const STUB_TOKEN: &str = "test-access-token";

/// In-memory state of the stub drive provider.
#[derive(Clone, Default)]
pub struct DriveStub {
    /// `(file_id, raw JSON content)` of the data file, if created.
    pub file: Arc<Mutex<Option<(String, String)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {STUB_TOKEN}"))
        .unwrap_or(false)
}

async fn stub_token() -> Json<Value> {
    Json(json!({ "access_token": STUB_TOKEN, "expires_in": 3599 }))
}

async fn stub_revoke() -> StatusCode {
    StatusCode::OK
}

async fn stub_list(
    State(stub): State<DriveStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let files = match stub.file.lock().unwrap().as_ref() {
        Some((id, _)) => json!([{ "id": id, "name": "scenecast-data.json" }]),
        None => json!([]),
    };
    (StatusCode::OK, Json(json!({ "files": files })))
}

async fn stub_create(
    State(stub): State<DriveStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    *stub.file.lock().unwrap() = Some(("file-1".to_string(), String::new()));
    (StatusCode::OK, Json(json!({ "id": "file-1" })))
}

async fn stub_read(
    State(stub): State<DriveStub>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> (StatusCode, String) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    match stub.file.lock().unwrap().as_ref() {
        Some((file_id, content)) if *file_id == id => (StatusCode::OK, content.clone()),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn stub_upload(
    State(stub): State<DriveStub>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    body: String,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let delimiter = format!("\r\n--{STUB_BOUNDARY}");
    let parts: Vec<&str> = body.split(&delimiter).collect();
    let content = parts[2].split_once("\r\n\r\n").unwrap().1;

    let mut file = stub.file.lock().unwrap();
    match file.as_mut() {
        Some((file_id, stored)) if *file_id == id => {
            *stored = content.to_string();
            StatusCode::OK
        }
        _ => StatusCode::NOT_FOUND,
    }
}

/// Serve a stub drive provider on an ephemeral port; returns its base URL.
pub async fn spawn_drive_stub(stub: DriveStub) -> String {
    let app = Router::new()
        .route("/token", post(stub_token))
        .route("/revoke", post(stub_revoke))
        .route("/drive/files", axum_get(stub_list).post(stub_create))
        .route("/drive/files/{id}", axum_get(stub_read))
        .route("/upload/files/{id}", patch(stub_upload))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An unroutable stub base for tests that never touch the network.
pub fn no_stub() -> String {
    "http://127.0.0.1:9".to_string()
}
