//! Category Handlers

use axum::{extract::State, Json};

use crate::application::dto::response::CategoryResponse;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List the category catalog
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = state.category_service.list_categories().await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}
