//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth_middleware;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes(state.clone()))
        .nest("/categories", category_routes(state.clone()))
        .nest("/chat-rooms", chat_room_routes(state.clone()))
        .nest("/hosts", host_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(handlers::auth::sign_up))
        .route("/sign-up/social", post(handlers::auth::social_sign_up))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Category routes (protected)
fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::category::list_categories))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Chat room routes (protected)
fn chat_room_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::chat_room::create_chat_room).get(handlers::chat_room::find_chat_rooms),
        )
        .route("/ranked", get(handlers::chat_room::find_ranked_chat_rooms))
        .route(
            "/{room_id}/participants",
            post(handlers::chat_room::join_chat_room)
                .delete(handlers::chat_room::leave_chat_room),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Host subscription routes (protected)
fn host_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/following", get(handlers::host::get_following))
        .route("/@me/followers", get(handlers::host::get_my_followers))
        .route(
            "/{host_id}/followers",
            post(handlers::host::follow_host).delete(handlers::host::unfollow_host),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
