//! Authentication API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{sign_up_body, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_sign_up_with_valid_data() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            Some(sign_up_body("alice@example.com", "alice")),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["nickname"], "alice");
    assert_eq!(body["role"], "USER");
    assert!(body["id"].is_string());
    assert!(body["host_id"].is_string());
}

#[tokio::test]
async fn test_sign_up_with_invalid_email_fails() {
    let app = TestApp::new();

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            Some(sign_up_body("not-an-email", "alice")),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_with_short_password_fails() {
    let app = TestApp::new();
    let mut body = sign_up_body("alice@example.com", "alice");
    body["password"] = json!("short");

    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/sign-up", Some(body), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_without_required_terms_fails() {
    let app = TestApp::new();
    let mut body = sign_up_body("alice@example.com", "alice");
    body["terms_agreements"] = json!([{ "terms_id": 1, "agreed": true }]);

    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/sign-up", Some(body), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_up_with_duplicate_email_fails() {
    let app = TestApp::new();
    app.sign_up_and_login("alice").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            Some(sign_up_body("alice@example.com", "alice2")),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
async fn test_social_sign_up() {
    let app = TestApp::new();
    let body = json!({
        "email": "bob@example.com",
        "nickname": "bob",
        "social_profile": {
            "provider": "GOOGLE",
            "social_id": "google-123",
            "social_email": "bob@example.com"
        },
        "terms_agreements": [
            { "terms_id": 1, "agreed": true },
            { "terms_id": 2, "agreed": true }
        ]
    });

    let (status, user) = app
        .request(Method::POST, "/api/v1/auth/sign-up/social", Some(body), None)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "SOCIAL");

    // Social accounts have no password
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "bob@example.com", "password": TEST_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_invalid_credentials_fails() {
    let app = TestApp::new();
    app.sign_up_and_login("alice").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "WrongPassword1!" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let app = TestApp::new();

    let (status, _) = app
        .request(Method::GET, "/api/v1/users/@me", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/users/@me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, body) = app.get("/api/v1/users/@me", &alice.access_token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], alice.id.as_str());
    assert_eq!(body["nickname"], "alice");
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, tokens) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            Some(json!({ "refresh_token": alice.refresh_token })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tokens["token_type"], "Bearer");

    let new_access = tokens["access_token"].as_str().unwrap();
    let (status, _) = app.get("/api/v1/users/@me", new_access).await;
    assert_eq!(status, StatusCode::OK);

    // The old refresh token was rotated out
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            Some(json!({ "refresh_token": alice.refresh_token })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
