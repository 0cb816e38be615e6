//! Chat Room API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_list_categories() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, body) = app.get("/api/v1/categories", &alice.access_token).await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["MOVIE", "MUSIC", "GAME", "SPORTS", "STUDY", "DAILY"]);
}

#[tokio::test]
async fn test_create_chat_room_seats_creator() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let room_id = app.create_room(&alice, "Movie night", 3).await;

    let room = app.find_room(&alice, &room_id).await.unwrap();
    assert_eq!(room["name"], "Movie night");
    assert_eq!(room["current_user_count"], 1);
    assert_eq!(room["max_user_count"], 3);
    assert_eq!(room["room_manager_user_id"], alice.id.as_str());
    assert_eq!(room["category"]["code"], "MOVIE");
    assert_eq!(room["tags"], json!(["sci-fi"]));
    assert_eq!(room["joined"], true);
}

#[tokio::test]
async fn test_create_chat_room_with_unknown_category() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, _) = app
        .post(
            "/api/v1/chat-rooms",
            json!({ "category_code": "NOPE", "name": "Room", "max_user_count": 3 }),
            &alice.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, rooms) = app.get("/api/v1/chat-rooms", &alice.access_token).await;
    assert_eq!(rooms, json!([]));
}

#[tokio::test]
async fn test_create_chat_room_validation() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, _) = app
        .post(
            "/api/v1/chat-rooms",
            json!({ "category_code": "MOVIE", "name": "", "max_user_count": 3 }),
            &alice.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_and_leave_round_trip() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let room_id = app.create_room(&alice, "Room", 3).await;
    let participants = format!("/api/v1/chat-rooms/{}/participants", room_id);

    let (status, _) = app.post(&participants, json!({}), &bob.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let room = app.find_room(&bob, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 2);
    assert_eq!(room["joined"], true);

    let (status, _) = app.delete(&participants, &bob.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let room = app.find_room(&bob, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 1);
    assert_eq!(room["joined"], false);
}

#[tokio::test]
async fn test_join_twice_conflicts() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let room_id = app.create_room(&alice, "Room", 3).await;

    // The creator is already seated
    let (status, body) = app
        .post(
            &format!("/api/v1/chat-rooms/{}/participants", room_id),
            json!({}),
            &alice.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 20002);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already a participant"));
    let room = app.find_room(&alice, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 1);
}

#[tokio::test]
async fn test_join_full_room_conflicts() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let carol = app.sign_up_and_login("carol").await;
    let room_id = app.create_room(&alice, "Pair", 2).await;
    let participants = format!("/api/v1/chat-rooms/{}/participants", room_id);

    let (status, _) = app.post(&participants, json!({}), &bob.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.post(&participants, json!({}), &carol.access_token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 20001);
    assert!(body["message"].as_str().unwrap().contains("at capacity"));

    let room = app.find_room(&carol, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 2);
    assert_eq!(room["joined"], false);
}

#[tokio::test]
async fn test_leave_without_membership_conflicts() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let room_id = app.create_room(&alice, "Room", 3).await;

    let (status, body) = app
        .delete(
            &format!("/api/v1/chat-rooms/{}/participants", room_id),
            &bob.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 20003);
    let room = app.find_room(&alice, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 1);
}

#[tokio::test]
async fn test_membership_conflicts_have_distinct_codes() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let carol = app.sign_up_and_login("carol").await;
    let room_id = app.create_room(&alice, "Pair", 2).await;
    let participants = format!("/api/v1/chat-rooms/{}/participants", room_id);

    let (_, duplicate) = app.post(&participants, json!({}), &alice.access_token).await;

    let (status, _) = app.post(&participants, json!({}), &bob.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, full) = app.post(&participants, json!({}), &carol.access_token).await;

    let (status, _) = app.delete(&participants, &alice.access_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, not_member) = app.delete(&participants, &alice.access_token).await;

    let codes = [&full, &duplicate, &not_member].map(|body| body["code"].as_u64().unwrap());
    assert_eq!(codes, [20001, 20002, 20003]);

    let room = app.find_room(&bob, &room_id).await.unwrap();
    assert_eq!(room["current_user_count"], 1);
}

#[tokio::test]
async fn test_join_unknown_room() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;

    let (status, _) = app
        .post("/api/v1/chat-rooms/42/participants", json!({}), &alice.access_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/v1/chat-rooms/abc/participants", json!({}), &alice.access_token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_find_chat_rooms_filters_and_pages() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let first = app.create_room(&alice, "First", 5).await;
    let second = app.create_room(&alice, "Second", 5).await;
    let (status, _) = app
        .post(
            "/api/v1/chat-rooms",
            json!({
                "category_code": "GAME",
                "name": "Game room",
                "max_user_count": 5,
                "tags": ["rpg"]
            }),
            &alice.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, movies) = app
        .get("/api/v1/chat-rooms?category_code=MOVIE", &alice.access_token)
        .await;
    let ids: Vec<&str> = movies
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let (_, tagged) = app
        .get("/api/v1/chat-rooms?tag=rpg", &alice.access_token)
        .await;
    assert_eq!(tagged.as_array().unwrap().len(), 1);
    assert_eq!(tagged[0]["name"], "Game room");

    let (_, page) = app
        .get("/api/v1/chat-rooms?page=1&size=2", &alice.access_token)
        .await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["id"], first.as_str());
}

#[tokio::test]
async fn test_ranked_chat_rooms_order_by_occupancy() {
    let app = TestApp::new();
    let alice = app.sign_up_and_login("alice").await;
    let bob = app.sign_up_and_login("bob").await;
    let quiet = app.create_room(&alice, "Quiet", 5).await;
    let busy = app.create_room(&bob, "Busy", 5).await;
    let newest = app.create_room(&alice, "Newest", 5).await;

    let (status, _) = app
        .post(
            &format!("/api/v1/chat-rooms/{}/participants", busy),
            json!({}),
            &alice.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, ranked) = app
        .get("/api/v1/chat-rooms/ranked", &bob.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = ranked
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    // Ties on occupancy fall back to the older room first
    assert_eq!(ids, vec![busy.as_str(), quiet.as_str(), newest.as_str()]);
    assert_eq!(ranked[0]["joined"], true);
    assert_eq!(ranked[1]["joined"], false);
}

#[tokio::test]
async fn test_chat_rooms_require_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/chat-rooms", "bogus").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
