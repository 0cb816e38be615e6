//! Host Repository Implementation
//!
//! PostgreSQL implementation of the HostRepository trait.
//! Handles host/follower records and follow statuses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::{Follower, Host, HostFollowStatus, HostRepository};
use crate::infrastructure::database::map_unique_violation;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct HostRow {
    id: i64,
    user_id: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct FollowStatusRow {
    id: i64,
    host_id: i64,
    follower_id: i64,
    host_user_id: i64,
    follower_user_id: i64,
    followed_at: DateTime<Utc>,
}

impl From<FollowStatusRow> for HostFollowStatus {
    fn from(row: FollowStatusRow) -> Self {
        HostFollowStatus {
            id: row.id,
            host_id: row.host_id,
            follower_id: row.follower_id,
            host_user_id: row.host_user_id,
            follower_user_id: row.follower_user_id,
            followed_at: row.followed_at,
        }
    }
}

const FOLLOW_STATUS_SELECT: &str = r#"
    SELECT s.id, s.host_id, s.follower_id, h.user_id AS host_user_id,
           f.user_id AS follower_user_id, s.followed_at
    FROM host_follow_statuses s
    INNER JOIN hosts h ON h.id = s.host_id
    INNER JOIN followers f ON f.id = s.follower_id
"#;

/// PostgreSQL host repository bound to an open transaction.
pub struct PgHostRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgHostRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    async fn find_statuses(&mut self, predicate: &str, user_id: i64)
        -> Result<Vec<HostFollowStatus>, AppError> {
        let sql = format!(
            "{} WHERE {} = $1 ORDER BY s.followed_at DESC, s.id DESC",
            FOLLOW_STATUS_SELECT, predicate
        );
        let rows = sqlx::query_as::<_, FollowStatusRow>(&sql)
            .bind(user_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(HostFollowStatus::from).collect())
    }
}

#[async_trait]
impl HostRepository for PgHostRepository<'_> {
    async fn save_host(&mut self, host: &Host) -> Result<Host, AppError> {
        sqlx::query("INSERT INTO hosts (id, user_id) VALUES ($1, $2)")
            .bind(host.id)
            .bind(host.user_id)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict(format!("User {} already has a host", host.user_id))
                })
            })?;

        Ok(host.clone())
    }

    async fn save_follower(&mut self, follower: &Follower) -> Result<Follower, AppError> {
        sqlx::query("INSERT INTO followers (id, user_id) VALUES ($1, $2)")
            .bind(follower.id)
            .bind(follower.user_id)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict(format!("User {} already has a follower", follower.user_id))
                })
            })?;

        Ok(follower.clone())
    }

    async fn find_host_by_id(&mut self, host_id: i64) -> Result<Option<Host>, AppError> {
        let row = sqlx::query_as::<_, HostRow>("SELECT id, user_id FROM hosts WHERE id = $1")
            .bind(host_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(|r| Host { id: r.id, user_id: r.user_id }))
    }

    async fn find_host_by_user_id(&mut self, user_id: i64) -> Result<Option<Host>, AppError> {
        let row = sqlx::query_as::<_, HostRow>("SELECT id, user_id FROM hosts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(|r| Host { id: r.id, user_id: r.user_id }))
    }

    async fn find_follower_by_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Option<Follower>, AppError> {
        let row =
            sqlx::query_as::<_, HostRow>("SELECT id, user_id FROM followers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(row.map(|r| Follower { id: r.id, user_id: r.user_id }))
    }

    async fn save_follow_status(
        &mut self,
        status: &HostFollowStatus,
    ) -> Result<HostFollowStatus, AppError> {
        sqlx::query(
            r#"
            INSERT INTO host_follow_statuses (id, host_id, follower_id, followed_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(status.id)
        .bind(status.host_id)
        .bind(status.follower_id)
        .bind(status.followed_at)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::Conflict(format!("Already following host {}", status.host_id))
            })
        })?;

        Ok(status.clone())
    }

    async fn delete_follow_status(
        &mut self,
        host_id: i64,
        follower_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM host_follow_statuses WHERE host_id = $1 AND follower_id = $2",
        )
        .bind(host_id)
        .bind(follower_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_host_id_and_follower_user_id(
        &mut self,
        host_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM host_follow_statuses s
                INNER JOIN followers f ON f.id = s.follower_id
                WHERE s.host_id = $1 AND f.user_id = $2
            )
            "#,
        )
        .bind(host_id)
        .bind(user_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }

    async fn find_by_follower_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<HostFollowStatus>, AppError> {
        self.find_statuses("f.user_id", user_id).await
    }

    async fn find_by_host_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<HostFollowStatus>, AppError> {
        self.find_statuses("h.user_id", user_id).await
    }
}
