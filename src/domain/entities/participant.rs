//! Chat room participant entity and repository trait.
//!
//! Maps to the `chat_room_participants` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A user's membership in a chat room (one join-to-leave episode).
///
/// Maps to the `chat_room_participants` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - chat_room_id: BIGINT NOT NULL REFERENCES chat_rooms(id) ON DELETE CASCADE
/// - joined_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - UNIQUE (user_id, chat_room_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoomParticipant {
    pub id: i64,
    pub user_id: i64,
    pub chat_room_id: i64,
    pub joined_at: DateTime<Utc>,
}

impl ChatRoomParticipant {
    pub fn new(id: i64, user_id: i64, chat_room_id: i64) -> Self {
        Self {
            id,
            user_id,
            chat_room_id,
            joined_at: Utc::now(),
        }
    }
}

/// Repository trait for participant data access, scoped to one transaction.
#[async_trait]
pub trait ChatRoomParticipantRepository: Send {
    /// Insert a participant row.
    ///
    /// Fails with [`AppError::DuplicateMembership`] if the user already has a
    /// row for this room.
    async fn save(&mut self, participant: &ChatRoomParticipant)
        -> Result<ChatRoomParticipant, AppError>;

    /// Delete the participant row of a user in a room.
    ///
    /// Fails with [`AppError::NotMember`] if no row was deleted.
    async fn delete_by_user_and_room(
        &mut self,
        user_id: i64,
        chat_room_id: i64,
    ) -> Result<(), AppError>;

    /// Number of participant rows for a room.
    async fn count_by_room(&mut self, chat_room_id: i64) -> Result<i64, AppError>;
}
