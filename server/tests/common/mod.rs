//! Shared test harness: in-memory database, temp file storage and request
//! helpers for driving the router with `tower::ServiceExt`.

#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use entity::prelude::Language;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveValue::Set, ConnectOptions, DatabaseConnection, EntityTrait};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use server::api::servers::app_state::AppState;
use server::api::servers::rest;
use server::bootstrap::config::{
    AuthConfig, Config, CorsConfig, DbConfig, ServerConfig, StorageConfig,
};
use server::modules::auth::jwt;
use server::modules::storage::FileStorage;

const MULTIPART_BOUNDARY: &str = "test-boundary-x7pq";

#[ctor::ctor]
fn global_test_setup() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .init();
}

/// A router wired to a fresh in-memory database and temp storage dir.
pub struct TestServer {
    pub router: Router,
    pub db: DatabaseConnection,
    pub storage_dir: TempDir,
}

pub async fn setup_test_server() -> TestServer {
    jwt::init_jwt_secret("test-secret");

    // A single connection keeps every query on the same in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .connect_timeout(Duration::from_secs(5));

    let db = sea_orm::Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");

    Migrator::up(&db, None).await.expect("Migrations failed");

    seed_language(&db, "es", "Español").await;
    seed_language(&db, "en", "Inglés").await;

    let storage_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = FileStorage::new(storage_dir.path()).expect("Failed to init storage");

    let config = test_config(&storage_dir);
    let router = rest::build_router(AppState::new(db.clone(), storage), &config);

    TestServer {
        router,
        db,
        storage_dir,
    }
}

fn test_config(storage_dir: &TempDir) -> Config {
    Config {
        server: ServerConfig { rest_port: 0 },
        db: DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            max_lifetime: Duration::from_secs(600),
            logging_enabled: false,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: false,
        },
        storage: StorageConfig {
            root: storage_dir.path().to_path_buf(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
        },
    }
}

async fn seed_language(db: &DatabaseConnection, code: &str, name: &str) {
    let now = Utc::now();
    Language::insert(entity::language::ActiveModel {
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        native_name: Set(None),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    })
    .exec(db)
    .await
    .expect("Failed to seed language");
}

pub fn admin_token() -> String {
    jwt::generate_token(1, "admin").expect("token")
}

pub fn librarian_token() -> String {
    jwt::generate_token(2, "librarian").expect("token")
}

pub fn member_token() -> String {
    jwt::generate_token(3, "member").expect("token")
}

/// Send a request with an optional bearer token and optional JSON body.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    dispatch(router, request).await
}

/// Send a multipart request carrying a `data` JSON part plus file parts
/// given as (field name, file name, content type, bytes).
pub async fn send_multipart(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    data: &Value,
    files: &[(&str, &str, &str, &[u8])],
) -> (StatusCode, Value) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
        )
        .as_bytes(),
    );
    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method(method).uri(uri).header(
        "Content-Type",
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = builder.body(Body::from(body)).expect("build request");
    dispatch(router, request).await
}

async fn dispatch(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router call failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Minimal valid book payload; pass overrides to vary fields.
pub fn book_payload(title: &str, isbn: &str) -> Value {
    json!({
        "title": title,
        "isbn": isbn,
        "language_code": "es",
        "book_type": "digital",
        "access_level": "free",
        "copyright_status": "copyrighted",
    })
}

/// Create a book through the API and return its JSON.
pub async fn create_book(router: &Router, token: &str, data: Value) -> Value {
    let (status, body) = send_multipart(
        router,
        Method::POST,
        "/api/v1/books",
        Some(token),
        &data,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "book create failed: {body}");
    body
}

/// Create a category through the API and return its JSON.
pub async fn create_category(router: &Router, token: &str, data: Value) -> Value {
    let (status, body) = send_multipart(
        router,
        Method::POST,
        "/api/v1/categories",
        Some(token),
        &data,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "category create failed: {body}");
    body
}
