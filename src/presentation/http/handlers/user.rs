//! User Handlers

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::response::UserResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user(auth.user_id).await?;

    Ok(Json(UserResponse::from(user)))
}
