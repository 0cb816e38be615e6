//! Chat room entity and repository trait.
//!
//! Maps to the `chat_rooms` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;
use crate::shared::error::AppError;

/// A chat room with a bounded number of participants.
///
/// Maps to the `chat_rooms` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - room_manager_user_id: BIGINT NOT NULL REFERENCES users(id)
/// - name: VARCHAR(100) NOT NULL
/// - max_user_count: INTEGER NOT NULL
/// - current_user_count: INTEGER NOT NULL DEFAULT 0
/// - tags: TEXT[] NOT NULL DEFAULT '{}'
/// - category_code: VARCHAR(50) NOT NULL REFERENCES categories(code)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// `CHECK (current_user_count BETWEEN 0 AND max_user_count)` holds for every
/// committed row. The counter is only moved by
/// [`ChatRoomRepository::increment_occupancy`] and
/// [`ChatRoomRepository::decrement_occupancy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// User who created the room
    pub room_manager_user_id: i64,

    /// Room name (1-100 characters)
    pub name: String,

    /// Capacity
    pub max_user_count: i32,

    /// Live occupancy
    pub current_user_count: i32,

    /// Free-form tags, unique within the room
    pub tags: Vec<String>,

    /// Code of the category this room belongs to
    pub category_code: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Build a fresh, empty room owned by `room_manager_user_id`.
    pub fn new(
        id: i64,
        room_manager_user_id: i64,
        name: String,
        max_user_count: i32,
        tags: Vec<String>,
        category_code: String,
    ) -> Self {
        Self {
            id,
            room_manager_user_id,
            name,
            max_user_count,
            current_user_count: 0,
            tags,
            category_code,
            created_at: Utc::now(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Ordering applied to chat room search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoomOrder {
    /// Newest first (`id DESC`)
    #[default]
    Latest,
    /// Most occupied first, ties broken by `id ASC`
    Popularity,
}

/// Filter for chat room discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatRoomFilter {
    pub category_code: Option<String>,
    pub tag: Option<String>,
    pub order: ChatRoomOrder,
    /// Zero-based page index
    pub page: u32,
    /// Page size (already clamped by the caller)
    pub size: u32,
}

impl ChatRoomFilter {
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Whether a room passes the category and tag predicates.
    pub fn matches(&self, room: &ChatRoom) -> bool {
        let category_ok = self
            .category_code
            .as_deref()
            .map_or(true, |code| room.category_code == code);
        let tag_ok = self.tag.as_deref().map_or(true, |tag| room.has_tag(tag));
        category_ok && tag_ok
    }
}

/// One search hit: the room, its category and whether the requester is inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoomListing {
    pub room: ChatRoom,
    pub category: Category,
    pub joined: bool,
}

/// Repository trait for chat room data access, scoped to one transaction.
#[async_trait]
pub trait ChatRoomRepository: Send {
    /// Find a room by its Snowflake ID.
    async fn find_by_id(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError>;

    /// Find a room and hold its row lock until the transaction ends.
    ///
    /// Membership changes on the same room queue behind this lock.
    async fn find_by_id_for_update(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError>;

    /// Insert a new room.
    async fn save(&mut self, room: &ChatRoom) -> Result<ChatRoom, AppError>;

    /// Atomically add one occupant.
    ///
    /// Fails with [`AppError::CapacityExceeded`] without mutating anything when
    /// the room is full, and [`AppError::NotFound`] when it does not exist.
    /// Returns the new occupancy.
    async fn increment_occupancy(&mut self, id: i64) -> Result<i32, AppError>;

    /// Atomically remove one occupant.
    ///
    /// Fails with [`AppError::InvariantViolation`] when the counter is already
    /// zero. Returns the new occupancy.
    async fn decrement_occupancy(&mut self, id: i64) -> Result<i32, AppError>;

    /// Filter, order and page rooms for discovery.
    async fn search(
        &mut self,
        filter: &ChatRoomFilter,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomListing>, AppError>;
}
