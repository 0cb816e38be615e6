//! Chat Room Participant Repository Implementation
//!
//! PostgreSQL implementation of the ChatRoomParticipantRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::{ChatRoomParticipant, ChatRoomParticipantRepository};
use crate::infrastructure::database::map_unique_violation;
use crate::shared::error::AppError;

/// Database row representation matching the chat_room_participants table schema.
#[derive(Debug, sqlx::FromRow)]
struct ParticipantRow {
    id: i64,
    user_id: i64,
    chat_room_id: i64,
    joined_at: DateTime<Utc>,
}

impl From<ParticipantRow> for ChatRoomParticipant {
    fn from(row: ParticipantRow) -> Self {
        ChatRoomParticipant {
            id: row.id,
            user_id: row.user_id,
            chat_room_id: row.chat_room_id,
            joined_at: row.joined_at,
        }
    }
}

/// PostgreSQL participant repository bound to an open transaction.
pub struct PgChatRoomParticipantRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgChatRoomParticipantRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ChatRoomParticipantRepository for PgChatRoomParticipantRepository<'_> {
    async fn save(
        &mut self,
        participant: &ChatRoomParticipant,
    ) -> Result<ChatRoomParticipant, AppError> {
        let row = sqlx::query_as::<_, ParticipantRow>(
            r#"
            INSERT INTO chat_room_participants (id, user_id, chat_room_id, joined_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, chat_room_id, joined_at
            "#,
        )
        .bind(participant.id)
        .bind(participant.user_id)
        .bind(participant.chat_room_id)
        .bind(participant.joined_at)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || AppError::DuplicateMembership {
                user_id: participant.user_id,
                chat_room_id: participant.chat_room_id,
            })
        })?;

        Ok(row.into())
    }

    async fn delete_by_user_and_room(
        &mut self,
        user_id: i64,
        chat_room_id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM chat_room_participants WHERE user_id = $1 AND chat_room_id = $2",
        )
        .bind(user_id)
        .bind(chat_room_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotMember {
                user_id,
                chat_room_id,
            });
        }

        Ok(())
    }

    async fn count_by_room(&mut self, chat_room_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM chat_room_participants WHERE chat_room_id = $1",
        )
        .bind(chat_room_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count)
    }
}
