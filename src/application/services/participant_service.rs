//! Chat Room Participant Service
//!
//! Handles joining and leaving chat rooms. The occupancy counter and the
//! participant rows move together inside one transaction; a failed join rolls
//! back its counter increment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::chat_room_service::ChatRoomError;
use crate::domain::ChatRoomParticipant;
use crate::infrastructure::database::{complete, TransactionContext, UnitOfWork};
use crate::infrastructure::metrics;
use crate::shared::snowflake::SnowflakeGenerator;

/// Participant service trait
#[async_trait]
pub trait ChatRoomParticipantService: Send + Sync {
    /// Join a room, taking one seat.
    async fn join_chat_room(&self, room_id: i64, user_id: i64) -> Result<(), ChatRoomError>;

    /// Leave a room, freeing one seat.
    async fn leave_chat_room(&self, room_id: i64, user_id: i64) -> Result<(), ChatRoomError>;
}

/// ChatRoomParticipantService implementation
pub struct ChatRoomParticipantServiceImpl {
    uow: Arc<dyn UnitOfWork>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl ChatRoomParticipantServiceImpl {
    pub fn new(uow: Arc<dyn UnitOfWork>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self { uow, id_generator }
    }

    /// Join inside a transaction owned by the caller.
    ///
    /// Nothing is committed here; on error the caller must roll back, which
    /// also undoes the occupancy increment.
    pub async fn join_in(
        &self,
        tx: &mut dyn TransactionContext,
        room_id: i64,
        user_id: i64,
    ) -> Result<ChatRoomParticipant, ChatRoomError> {
        if tx.chat_rooms().find_by_id(room_id).await?.is_none() {
            return Err(ChatRoomError::RoomNotFound);
        }
        if tx.users().find_by_id(user_id).await?.is_none() {
            return Err(ChatRoomError::UserNotFound);
        }

        let occupancy = tx.chat_rooms().increment_occupancy(room_id).await?;

        let participant = ChatRoomParticipant::new(self.id_generator.generate(), user_id, room_id);
        let participant = tx.participants().save(&participant).await?;

        info!(room_id, user_id, occupancy, "User joined chat room");
        Ok(participant)
    }

    /// Leave inside a transaction owned by the caller.
    ///
    /// The room row stays locked from the lookup to the end of the
    /// transaction, so a second leave by the same user sees the row already
    /// deleted and fails with `NotMember`.
    pub async fn leave_in(
        &self,
        tx: &mut dyn TransactionContext,
        room_id: i64,
        user_id: i64,
    ) -> Result<(), ChatRoomError> {
        if tx.chat_rooms().find_by_id_for_update(room_id).await?.is_none() {
            return Err(ChatRoomError::RoomNotFound);
        }
        if tx.users().find_by_id(user_id).await?.is_none() {
            return Err(ChatRoomError::UserNotFound);
        }

        tx.participants()
            .delete_by_user_and_room(user_id, room_id)
            .await?;
        let occupancy = tx.chat_rooms().decrement_occupancy(room_id).await?;

        info!(room_id, user_id, occupancy, "User left chat room");
        Ok(())
    }
}

#[async_trait]
impl ChatRoomParticipantService for ChatRoomParticipantServiceImpl {
    async fn join_chat_room(&self, room_id: i64, user_id: i64) -> Result<(), ChatRoomError> {
        let mut tx = self.uow.begin().await?;
        let result = self.join_in(tx.as_mut(), room_id, user_id).await;
        let result = complete(tx, result).await;

        match &result {
            Ok(_) => metrics::record_join("success"),
            Err(ChatRoomError::RoomFull(_)) => {
                warn!(room_id, user_id, "Join rejected: room is full");
                metrics::record_join("room_full");
            }
            Err(ChatRoomError::DuplicateMembership { .. }) => {
                warn!(room_id, user_id, "Join rejected: already a participant");
                metrics::record_join("duplicate");
            }
            Err(e) => {
                warn!(room_id, user_id, error = %e, "Join failed");
                metrics::record_join("error");
            }
        }

        result.map(|_| ())
    }

    async fn leave_chat_room(&self, room_id: i64, user_id: i64) -> Result<(), ChatRoomError> {
        let mut tx = self.uow.begin().await?;
        let result = self.leave_in(tx.as_mut(), room_id, user_id).await;
        let result = complete(tx, result).await;

        match &result {
            Ok(_) => metrics::record_leave("success"),
            Err(ChatRoomError::NotMember { .. }) => {
                warn!(room_id, user_id, "Leave rejected: not a participant");
                metrics::record_leave("not_member");
            }
            Err(ChatRoomError::InvariantViolation(msg)) => {
                error!(room_id, user_id, "Occupancy invariant violated on leave: {}", msg);
                metrics::record_leave("error");
            }
            Err(e) => {
                warn!(room_id, user_id, error = %e, "Leave failed");
                metrics::record_leave("error");
            }
        }

        result
    }
}
