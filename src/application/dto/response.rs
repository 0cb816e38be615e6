//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake ids are rendered as
//! strings.

use serde::Serialize;

use crate::application::services::{
    AuthTokens, CategoryDto, ChatRoomSummaryDto, FollowDto, UserDto,
};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub role: String,
    pub host_id: Option<String>,
    pub created_at: String,
}

impl From<UserDto> for UserResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            nickname: dto.nickname,
            role: dto.role,
            host_id: dto.host_id,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub code: String,
    pub name: String,
    pub order_num: i32,
}

impl From<CategoryDto> for CategoryResponse {
    fn from(dto: CategoryDto) -> Self {
        Self {
            code: dto.code,
            name: dto.name,
            order_num: dto.order_num,
        }
    }
}

/// Create chat room response
#[derive(Debug, Serialize)]
pub struct CreateChatRoomResponse {
    pub chat_room_id: String,
}

/// Chat room summary response
#[derive(Debug, Serialize)]
pub struct ChatRoomResponse {
    pub id: String,
    pub name: String,
    pub max_user_count: i32,
    pub current_user_count: i32,
    pub tags: Vec<String>,
    pub room_manager_user_id: String,
    pub category: CategoryResponse,
    pub joined: bool,
}

impl From<ChatRoomSummaryDto> for ChatRoomResponse {
    fn from(dto: ChatRoomSummaryDto) -> Self {
        Self {
            id: dto.id.to_string(),
            name: dto.name,
            max_user_count: dto.max_user_count,
            current_user_count: dto.current_user_count,
            tags: dto.tags,
            room_manager_user_id: dto.room_manager_user_id.to_string(),
            category: dto.category.into(),
            joined: dto.joined,
        }
    }
}

/// Follow status response
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub host_id: String,
    pub host_user_id: String,
    pub follower_user_id: String,
    pub followed_at: String,
}

impl From<FollowDto> for FollowResponse {
    fn from(dto: FollowDto) -> Self {
        Self {
            host_id: dto.host_id,
            host_user_id: dto.host_user_id,
            follower_user_id: dto.follower_user_id,
            followed_at: dto.followed_at,
        }
    }
}
