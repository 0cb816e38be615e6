//! Chat Room Service
//!
//! Handles chat room creation and discovery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::participant_service::ChatRoomParticipantServiceImpl;
use crate::domain::{ChatRoom, ChatRoomFilter, ChatRoomListing, ChatRoomOrder};
use crate::infrastructure::database::{complete, TransactionContext, UnitOfWork};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;
use crate::shared::validation::normalize_tags;

/// Chat room service trait
#[async_trait]
pub trait ChatRoomService: Send + Sync {
    /// Create a room and seat its creator in it. Returns the new room id.
    async fn create_chat_room(
        &self,
        creator_user_id: i64,
        request: CreateChatRoomDto,
    ) -> Result<i64, ChatRoomError>;

    /// Find rooms, newest first.
    async fn find_chat_rooms(
        &self,
        query: FindChatRoomsDto,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomSummaryDto>, ChatRoomError>;

    /// Find rooms, most occupied first.
    async fn find_chat_rooms_by_popularity(
        &self,
        query: FindChatRoomsDto,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomSummaryDto>, ChatRoomError>;
}

/// Create chat room request
#[derive(Debug, Clone)]
pub struct CreateChatRoomDto {
    pub category_code: String,
    pub name: String,
    pub max_user_count: i32,
    pub tags: Vec<String>,
}

/// Discovery query with paging already resolved
#[derive(Debug, Clone, Default)]
pub struct FindChatRoomsDto {
    pub category_code: Option<String>,
    pub tag: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl FindChatRoomsDto {
    fn into_filter(self, order: ChatRoomOrder) -> ChatRoomFilter {
        ChatRoomFilter {
            category_code: self.category_code,
            tag: self.tag,
            order,
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDto {
    pub code: String,
    pub name: String,
    pub order_num: i32,
}

/// Chat room as seen by one requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoomSummaryDto {
    pub id: i64,
    pub name: String,
    pub max_user_count: i32,
    pub current_user_count: i32,
    pub tags: Vec<String>,
    pub room_manager_user_id: i64,
    pub category: CategoryDto,
    /// Whether the requester is a participant
    pub joined: bool,
}

impl From<ChatRoomListing> for ChatRoomSummaryDto {
    fn from(listing: ChatRoomListing) -> Self {
        let ChatRoomListing {
            room,
            category,
            joined,
        } = listing;

        Self {
            id: room.id,
            name: room.name,
            max_user_count: room.max_user_count,
            current_user_count: room.current_user_count,
            tags: room.tags,
            room_manager_user_id: room.room_manager_user_id,
            category: CategoryDto {
                code: category.code,
                name: category.name,
                order_num: category.order_num,
            },
            joined,
        }
    }
}

/// Chat room and participant service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatRoomError {
    #[error("Chat room not found")]
    RoomNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Chat room is full")]
    RoomFull(i64),

    #[error("Already a participant of this chat room")]
    DuplicateMembership { user_id: i64, chat_room_id: i64 },

    #[error("Not a participant of this chat room")]
    NotMember { user_id: i64, chat_room_id: i64 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ChatRoomError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::CapacityExceeded(id) => ChatRoomError::RoomFull(id),
            AppError::DuplicateMembership {
                user_id,
                chat_room_id,
            } => ChatRoomError::DuplicateMembership {
                user_id,
                chat_room_id,
            },
            AppError::NotMember {
                user_id,
                chat_room_id,
            } => ChatRoomError::NotMember {
                user_id,
                chat_room_id,
            },
            AppError::InvariantViolation(msg) => ChatRoomError::InvariantViolation(msg),
            // Rooms, users and categories are resolved before any write
            other => ChatRoomError::Internal(other.to_string()),
        }
    }
}

/// ChatRoomService implementation
pub struct ChatRoomServiceImpl {
    uow: Arc<dyn UnitOfWork>,
    participants: Arc<ChatRoomParticipantServiceImpl>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl ChatRoomServiceImpl {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        participants: Arc<ChatRoomParticipantServiceImpl>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            uow,
            participants,
            id_generator,
        }
    }

    async fn create_in(
        &self,
        tx: &mut dyn TransactionContext,
        creator_user_id: i64,
        request: CreateChatRoomDto,
    ) -> Result<i64, ChatRoomError> {
        let category = tx
            .categories()
            .find_by_code(&request.category_code)
            .await?
            .ok_or(ChatRoomError::CategoryNotFound(request.category_code))?;

        if tx.users().find_by_id(creator_user_id).await?.is_none() {
            return Err(ChatRoomError::UserNotFound);
        }

        let room = ChatRoom::new(
            self.id_generator.generate(),
            creator_user_id,
            request.name,
            request.max_user_count,
            normalize_tags(request.tags),
            category.code,
        );
        tx.chat_rooms().save(&room).await?;

        // The creator takes the first seat in the same transaction
        self.participants
            .join_in(tx, room.id, creator_user_id)
            .await?;

        Ok(room.id)
    }

    async fn search(
        &self,
        filter: ChatRoomFilter,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomSummaryDto>, ChatRoomError> {
        let mut tx = self.uow.begin().await?;
        let result = tx.chat_rooms().search(&filter, requester_user_id).await;
        let listings = complete(tx, result).await?;

        Ok(listings.into_iter().map(ChatRoomSummaryDto::from).collect())
    }
}

#[async_trait]
impl ChatRoomService for ChatRoomServiceImpl {
    async fn create_chat_room(
        &self,
        creator_user_id: i64,
        request: CreateChatRoomDto,
    ) -> Result<i64, ChatRoomError> {
        let category_code = request.category_code.clone();

        let mut tx = self.uow.begin().await?;
        let result = self.create_in(tx.as_mut(), creator_user_id, request).await;
        let result = complete(tx, result).await;

        match &result {
            Ok(room_id) => {
                metrics::record_chat_room_created();
                info!(
                    room_id = *room_id,
                    user_id = creator_user_id,
                    category = %category_code,
                    "Chat room created"
                );
            }
            Err(e) => {
                warn!(user_id = creator_user_id, category = %category_code, error = %e, "Chat room creation rolled back");
            }
        }

        result
    }

    async fn find_chat_rooms(
        &self,
        query: FindChatRoomsDto,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomSummaryDto>, ChatRoomError> {
        self.search(query.into_filter(ChatRoomOrder::Latest), requester_user_id)
            .await
    }

    async fn find_chat_rooms_by_popularity(
        &self,
        query: FindChatRoomsDto,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomSummaryDto>, ChatRoomError> {
        self.search(
            query.into_filter(ChatRoomOrder::Popularity),
            requester_user_id,
        )
        .await
    }
}
