//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{
    LoginRequest, RefreshTokenRequest, SignUpRequest, SocialSignUpRequest,
};
use crate::application::dto::response::{TokenResponse, UserResponse};
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Sign up with email and password
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate(&body)?;

    let user = state.user_service.sign_up(body.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Sign up with a social provider account
pub async fn social_sign_up(
    State(state): State<AppState>,
    Json(body): Json<SocialSignUpRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate(&body)?;

    let user = state.user_service.social_sign_up(body.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate(&body)?;

    let tokens = state.auth_service.login(&body.email, &body.password).await?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Rotate the refresh token and issue a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth_service.refresh_token(&body.refresh_token).await?;

    Ok(Json(TokenResponse::from(tokens)))
}
