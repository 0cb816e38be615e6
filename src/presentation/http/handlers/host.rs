//! Host Subscription Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use super::parse_id;
use crate::application::dto::response::FollowResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Follow a host
pub async fn follow_host(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(host_id): Path<String>,
) -> Result<(StatusCode, Json<FollowResponse>), AppError> {
    let host_id = parse_id(&host_id, "host")?;

    let follow = state.host_service.follow(host_id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(FollowResponse::from(follow))))
}

/// Stop following a host
pub async fn unfollow_host(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(host_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let host_id = parse_id(&host_id, "host")?;

    state.host_service.unfollow(host_id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Hosts the caller follows
pub async fn get_following(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FollowResponse>>, AppError> {
    let follows = state.host_service.following(auth.user_id).await?;

    Ok(Json(follows.into_iter().map(FollowResponse::from).collect()))
}

/// Followers of the caller's host
pub async fn get_my_followers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FollowResponse>>, AppError> {
    let follows = state.host_service.followers(auth.user_id).await?;

    Ok(Json(follows.into_iter().map(FollowResponse::from).collect()))
}
