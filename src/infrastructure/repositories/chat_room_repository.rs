//! Chat Room Repository Implementation
//!
//! PostgreSQL implementation of the ChatRoomRepository trait.
//! Occupancy changes are single conditional UPDATE statements so concurrent
//! joins serialize on the row lock instead of racing in application memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::{Category, ChatRoom, ChatRoomFilter, ChatRoomListing, ChatRoomOrder, ChatRoomRepository};
use crate::shared::error::AppError;

/// Database row representation matching the chat_rooms table schema.
#[derive(Debug, sqlx::FromRow)]
struct ChatRoomRow {
    id: i64,
    room_manager_user_id: i64,
    name: String,
    max_user_count: i32,
    current_user_count: i32,
    tags: Vec<String>,
    category_code: String,
    created_at: DateTime<Utc>,
}

impl From<ChatRoomRow> for ChatRoom {
    fn from(row: ChatRoomRow) -> Self {
        ChatRoom {
            id: row.id,
            room_manager_user_id: row.room_manager_user_id,
            name: row.name,
            max_user_count: row.max_user_count,
            current_user_count: row.current_user_count,
            tags: row.tags,
            category_code: row.category_code,
            created_at: row.created_at,
        }
    }
}

/// Search row: room columns joined with its category and the requester's membership.
#[derive(Debug, sqlx::FromRow)]
struct ChatRoomListingRow {
    id: i64,
    room_manager_user_id: i64,
    name: String,
    max_user_count: i32,
    current_user_count: i32,
    tags: Vec<String>,
    category_code: String,
    created_at: DateTime<Utc>,
    category_name: String,
    category_order_num: i32,
    joined: bool,
}

impl From<ChatRoomListingRow> for ChatRoomListing {
    fn from(row: ChatRoomListingRow) -> Self {
        let category = Category {
            code: row.category_code.clone(),
            name: row.category_name,
            order_num: row.category_order_num,
        };
        ChatRoomListing {
            room: ChatRoom {
                id: row.id,
                room_manager_user_id: row.room_manager_user_id,
                name: row.name,
                max_user_count: row.max_user_count,
                current_user_count: row.current_user_count,
                tags: row.tags,
                category_code: row.category_code,
                created_at: row.created_at,
            },
            category,
            joined: row.joined,
        }
    }
}

const SEARCH_SELECT: &str = r#"
    SELECT r.id, r.room_manager_user_id, r.name, r.max_user_count, r.current_user_count,
           r.tags, r.category_code, r.created_at,
           c.name AS category_name, c.order_num AS category_order_num,
           EXISTS (
               SELECT 1 FROM chat_room_participants p
               WHERE p.chat_room_id = r.id AND p.user_id = $1
           ) AS joined
    FROM chat_rooms r
    INNER JOIN categories c ON c.code = r.category_code
    WHERE ($2::VARCHAR IS NULL OR r.category_code = $2)
      AND ($3::TEXT IS NULL OR $3 = ANY (r.tags))
"#;

/// PostgreSQL chat room repository bound to an open transaction.
pub struct PgChatRoomRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgChatRoomRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    async fn exists(&mut self, id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chat_rooms WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl ChatRoomRepository for PgChatRoomRepository<'_> {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, ChatRoomRow>(
            r#"
            SELECT id, room_manager_user_id, name, max_user_count, current_user_count,
                   tags, category_code, created_at
            FROM chat_rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(ChatRoom::from))
    }

    async fn find_by_id_for_update(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, ChatRoomRow>(
            r#"
            SELECT id, room_manager_user_id, name, max_user_count, current_user_count,
                   tags, category_code, created_at
            FROM chat_rooms
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(ChatRoom::from))
    }

    async fn save(&mut self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        let row = sqlx::query_as::<_, ChatRoomRow>(
            r#"
            INSERT INTO chat_rooms (id, room_manager_user_id, name, max_user_count,
                                    current_user_count, tags, category_code, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, room_manager_user_id, name, max_user_count, current_user_count,
                      tags, category_code, created_at
            "#,
        )
        .bind(room.id)
        .bind(room.room_manager_user_id)
        .bind(&room.name)
        .bind(room.max_user_count)
        .bind(room.current_user_count)
        .bind(&room.tags)
        .bind(&room.category_code)
        .bind(room.created_at)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(format!("Category or user for chat room {} not found", room.id))
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                AppError::BadRequest("Chat room occupancy out of range".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into())
    }

    async fn increment_occupancy(&mut self, id: i64) -> Result<i32, AppError> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE chat_rooms
            SET current_user_count = current_user_count + 1
            WHERE id = $1 AND current_user_count < max_user_count
            RETURNING current_user_count
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(count) = updated {
            return Ok(count);
        }

        if self.exists(id).await? {
            Err(AppError::CapacityExceeded(id))
        } else {
            Err(AppError::NotFound(format!("Chat room {} not found", id)))
        }
    }

    async fn decrement_occupancy(&mut self, id: i64) -> Result<i32, AppError> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE chat_rooms
            SET current_user_count = current_user_count - 1
            WHERE id = $1 AND current_user_count > 0
            RETURNING current_user_count
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(count) = updated {
            return Ok(count);
        }

        if self.exists(id).await? {
            Err(AppError::InvariantViolation(format!(
                "Occupancy of chat room {} would drop below zero",
                id
            )))
        } else {
            Err(AppError::NotFound(format!("Chat room {} not found", id)))
        }
    }

    async fn search(
        &mut self,
        filter: &ChatRoomFilter,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomListing>, AppError> {
        let order_by = match filter.order {
            ChatRoomOrder::Latest => "r.id DESC",
            ChatRoomOrder::Popularity => "r.current_user_count DESC, r.id ASC",
        };
        let sql = format!("{} ORDER BY {} LIMIT $4 OFFSET $5", SEARCH_SELECT, order_by);

        let rows = sqlx::query_as::<_, ChatRoomListingRow>(&sql)
            .bind(requester_user_id)
            .bind(filter.category_code.as_deref())
            .bind(filter.tag.as_deref())
            .bind(i64::from(filter.size))
            .bind(filter.offset())
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(ChatRoomListing::from).collect())
    }
}
