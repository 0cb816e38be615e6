//! Common Test Utilities
//!
//! Builds the real router over the in-memory store and drives it with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use tikichat_server::config::{
    ChatRoomSettings, CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings,
    SnowflakeSettings, StorageBackend,
};
use tikichat_server::infrastructure::memory::MemoryUnitOfWork;
use tikichat_server::startup::{build_router, AppState};

/// Test application builder
pub struct TestApp {
    pub router: Router,
}

/// A signed-up and logged-in user
pub struct TestUser {
    pub id: String,
    pub host_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub const TEST_PASSWORD: &str = "TestPassword123!";

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            backend: StorageBackend::Memory,
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-at-least-32-chars".into(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 14,
        },
        snowflake: SnowflakeSettings {
            machine_id: 7,
            epoch: 1704067200000,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        chat_room: ChatRoomSettings {
            default_page_size: 20,
            max_page_size: 50,
        },
        environment: "test".into(),
    }
}

impl TestApp {
    /// Fresh application over an empty, seeded in-memory store
    pub fn new() -> Self {
        let state = AppState::new(test_settings(), Arc::new(MemoryUnitOfWork::new()), None);

        Self {
            router: build_router(state),
        }
    }

    /// Send a request; returns the status and the JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Sign up with all terms agreed and log in
    pub async fn sign_up_and_login(&self, nickname: &str) -> TestUser {
        let email = format!("{}@example.com", nickname);
        let (status, user) = self
            .request(
                Method::POST,
                "/api/v1/auth/sign-up",
                Some(sign_up_body(&email, nickname)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {}", user);

        let (status, tokens) = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                Some(json!({ "email": email, "password": TEST_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", tokens);

        TestUser {
            id: user["id"].as_str().unwrap().to_string(),
            host_id: user["host_id"].as_str().unwrap().to_string(),
            access_token: tokens["access_token"].as_str().unwrap().to_string(),
            refresh_token: tokens["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a room and return its id
    pub async fn create_room(&self, user: &TestUser, name: &str, max_user_count: i32) -> String {
        let (status, body) = self
            .post(
                "/api/v1/chat-rooms",
                json!({
                    "category_code": "MOVIE",
                    "name": name,
                    "max_user_count": max_user_count,
                    "tags": ["sci-fi"]
                }),
                &user.access_token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

        body["chat_room_id"].as_str().unwrap().to_string()
    }

    /// Find a room in the newest-first listing as seen by `user`
    pub async fn find_room(&self, user: &TestUser, room_id: &str) -> Option<Value> {
        let (status, rooms) = self
            .get("/api/v1/chat-rooms?size=50", &user.access_token)
            .await;
        assert_eq!(status, StatusCode::OK);

        rooms
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == room_id)
            .cloned()
    }
}

/// Local sign-up body agreeing to every seeded terms document
pub fn sign_up_body(email: &str, nickname: &str) -> Value {
    json!({
        "email": email,
        "nickname": nickname,
        "password": TEST_PASSWORD,
        "terms_agreements": [
            { "terms_id": 1, "agreed": true },
            { "terms_id": 2, "agreed": true },
            { "terms_id": 3, "agreed": false }
        ]
    })
}
