//! Shared helpers for API integration tests: an app over a fresh in-memory
//! SQLite database, seeded with one user per role.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use rfid_assets::application::{AssetService, IdentityService};
use rfid_assets::domain::user::{CreateUserDto, UserRepositoryInterface, UserRole};
use rfid_assets::infrastructure::crypto::jwt::JwtConfig;
use rfid_assets::infrastructure::crypto::password::hash_password;
use rfid_assets::infrastructure::database::migrator::Migrator;
use rfid_assets::infrastructure::database::repositories::{AssetRepository, UserRepository};
use rfid_assets::{create_api_router, AppState};

/// Every seeded user shares this password.
pub const PASSWORD: &str = "secret123";

/// bcrypt at cost 12 is slow; hash the shared test password once per process.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

/// Build the full router over a fresh in-memory database seeded with users
/// `admin`, `manager`, `staff`, `viewer` and `alice` (staff).
pub async fn test_app() -> Router {
    // A single pooled connection keeps every query on the same in-memory DB.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let user_repo = Arc::new(UserRepository::new(db.clone()));
    for (username, role) in [
        ("admin", UserRole::Admin),
        ("manager", UserRole::Manager),
        ("staff", UserRole::Staff),
        ("viewer", UserRole::Viewer),
        ("alice", UserRole::Staff),
    ] {
        user_repo
            .create_user(CreateUserDto {
                username: username.to_string(),
                password_hash: password_hash(),
                role,
            })
            .await
            .unwrap();
    }

    let jwt_config = JwtConfig {
        secret: "integration-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "rfid-asset-service".to_string(),
    };

    let identity = Arc::new(IdentityService::new(user_repo, jwt_config));
    let assets = Arc::new(AssetService::new(Arc::new(AssetRepository::new(
        db.clone(),
    ))));

    create_api_router(AppState {
        assets,
        identity,
        db,
    })
}

/// Send a request and parse the JSON body (Null when empty or not JSON).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _headers, bytes) = send_raw(router, method, uri, token, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Send a request and return status, headers and the raw body.
pub async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

/// Log in a seeded user and return the bearer token.
pub async fn login(router: &Router, username: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {username}: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}
