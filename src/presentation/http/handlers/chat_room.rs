//! Chat Room Handlers

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::parse_id;
use crate::application::dto::request::{CreateChatRoomRequest, FindChatRoomsQuery};
use crate::application::dto::response::{ChatRoomResponse, CreateChatRoomResponse};
use crate::application::services::FindChatRoomsDto;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Create a chat room; the caller becomes its manager and first participant
pub async fn create_chat_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateChatRoomRequest>,
) -> Result<(StatusCode, Json<CreateChatRoomResponse>), AppError> {
    validate(&body)?;

    let room_id = state
        .chat_room_service
        .create_chat_room(auth.user_id, body.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateChatRoomResponse {
            chat_room_id: room_id.to_string(),
        }),
    ))
}

/// Find chat rooms, newest first
pub async fn find_chat_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<FindChatRoomsQuery>,
) -> Result<Json<Vec<ChatRoomResponse>>, AppError> {
    let query = resolve_query(&state, query);

    let rooms = state
        .chat_room_service
        .find_chat_rooms(query, auth.user_id)
        .await?;

    Ok(Json(rooms.into_iter().map(ChatRoomResponse::from).collect()))
}

/// Find chat rooms, most occupied first
pub async fn find_ranked_chat_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<FindChatRoomsQuery>,
) -> Result<Json<Vec<ChatRoomResponse>>, AppError> {
    let query = resolve_query(&state, query);

    let rooms = state
        .chat_room_service
        .find_chat_rooms_by_popularity(query, auth.user_id)
        .await?;

    Ok(Json(rooms.into_iter().map(ChatRoomResponse::from).collect()))
}

/// Join a chat room
pub async fn join_chat_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let room_id = parse_id(&room_id, "chat room")?;

    state
        .participant_service
        .join_chat_room(room_id, auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Leave a chat room
pub async fn leave_chat_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let room_id = parse_id(&room_id, "chat room")?;

    state
        .participant_service
        .leave_chat_room(room_id, auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn resolve_query(state: &AppState, query: FindChatRoomsQuery) -> FindChatRoomsDto {
    // Blank filters match everything
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    FindChatRoomsDto {
        category_code: non_blank(query.category_code),
        tag: non_blank(query.tag),
        page: query.page.unwrap_or(0),
        size: state.settings.chat_room.page_size(query.size),
    }
}
