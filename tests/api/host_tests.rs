//! Host Subscription API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_follow_and_list() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;

    let (status, follow) = app
        .post(
            &format!("/api/v1/hosts/{}/followers", alice.host_id),
            json!({}),
            &bob.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(follow["host_id"], alice.host_id.as_str());
    assert_eq!(follow["host_user_id"], alice.id.as_str());
    assert_eq!(follow["follower_user_id"], bob.id.as_str());

    let (status, following) = app
        .get("/api/v1/hosts/following", &bob.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(following.as_array().unwrap().len(), 1);
    assert_eq!(following[0]["host_id"], alice.host_id.as_str());

    let (status, followers) = app
        .get("/api/v1/hosts/@me/followers", &alice.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followers.as_array().unwrap().len(), 1);
    assert_eq!(followers[0]["follower_user_id"], bob.id.as_str());
}

#[tokio::test]
async fn test_follow_twice_conflicts() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let uri = format!("/api/v1/hosts/{}/followers", alice.host_id);

    let (status, _) = app.post(&uri, json!({}), &bob.access_token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post(&uri, json!({}), &bob.access_token).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, _) = app
        .post(
            &format!("/api/v1/hosts/{}/followers", alice.host_id),
            json!({}),
            &alice.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unfollow() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let uri = format!("/api/v1/hosts/{}/followers", alice.host_id);

    let (status, _) = app.delete(&uri, &bob.access_token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.post(&uri, json!({}), &bob.access_token).await;
    let (status, _) = app.delete(&uri, &bob.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, following) = app
        .get("/api/v1/hosts/following", &bob.access_token)
        .await;
    assert_eq!(following, json!([]));
}

#[tokio::test]
async fn test_follow_unknown_host() {
    let app = TestApp::new();
    let bob = app.sign_up_and_login("bob").await;

    let (status, _) = app
        .post("/api/v1/hosts/999/followers", json!({}), &bob.access_token)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
