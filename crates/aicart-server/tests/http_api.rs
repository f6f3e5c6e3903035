//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`.

use aicart_access::{AccessService, CredentialSource, DegradedDirectory, PasswordVerifier};
use aicart_core::{NewUser, Role};
use aicart_server::{AppState, router};
use aicart_store::{CredentialStore, MemoryCredentialStore};
use aicart_token::{KeyPair, TokenIssuer};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn cheap_passwords() -> PasswordVerifier {
    PasswordVerifier::with_params(1024, 1, 1).unwrap()
}

fn app(source: CredentialSource) -> Router {
    let tokens = Arc::new(TokenIssuer::new(
        KeyPair::generate().unwrap(),
        chrono::Duration::days(7),
    ));
    let access = AccessService::new(
        source,
        DegradedDirectory::builtin(),
        cheap_passwords(),
        tokens,
    );
    router(AppState::new(access))
}

async fn live_app() -> Router {
    let store = Arc::new(MemoryCredentialStore::new());
    store
        .create(NewUser {
            email: "boss@shop.com".to_string(),
            password_hash: cheap_passwords().hash_blocking("boss-pass").unwrap(),
            role: Role::Admin,
            name: "Boss".to_string(),
            credits: 100,
        })
        .await
        .unwrap();
    app(CredentialSource::Live(store))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_healthz_reports_mode() {
    let degraded = app(CredentialSource::Degraded);
    let (status, body) = send(&degraded, get_with_token("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["store_mode"], "degraded");

    let (_, body) = send(&live_app().await, get_with_token("/healthz", None)).await;
    assert_eq!(body["store_mode"], "live");
}

#[tokio::test]
async fn test_degraded_admin_login_then_admin_route() {
    let app = app(CredentialSource::Degraded);
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/admin/login",
            json!({"email": "admin@aicart.local", "password": "admin123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_with_token("/api/admin/session", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "degraded-admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_wrong_password_is_401_with_generic_code() {
    let app = app(CredentialSource::Degraded);
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/admin/login",
            json!({"email": "admin@aicart.local", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "invalid_credentials"}));
}

#[tokio::test]
async fn test_admin_route_refuses_user_session_and_missing_token() {
    let app = app(CredentialSource::Degraded);
    let (_, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "user@aicart.local", "password": "user123"}),
        ),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_with_token("/api/admin/session", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = send(&app, get_with_token("/api/admin/session", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_me_returns_claims() {
    let app = app(CredentialSource::Degraded);
    let (_, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "user@aicart.local", "password": "user123"}),
        ),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_with_token("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "degraded-user");
    assert_eq!(body["role"], "user");
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = app(CredentialSource::Degraded);
    let (status, _) = send(&app, get_with_token("/api/auth/me", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_live_signup_then_duplicate() {
    let app = live_app().await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/signup",
            json!({"email": "a@b.com", "password": "pw123456", "name": "Ann"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["credits"], 100);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["name"], "Ann");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/signup",
            json!({"email": "a@b.com", "password": "other"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email_taken");

    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "a@b.com", "password": "pw123456"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_live_admin_login() {
    let app = live_app().await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/admin/login",
            json!({"email": "boss@shop.com", "password": "boss-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Boss");

    // Degraded credentials mean nothing while the store is live.
    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/admin/login",
            json!({"email": "admin@aicart.local", "password": "admin123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation_and_malformed_body() {
    let app = app(CredentialSource::Degraded);
    let (status, body) = send(
        &app,
        post_json("/api/auth/signup", json!({"email": "x@y.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}
