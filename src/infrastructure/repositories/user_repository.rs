//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::{Role, SocialProfile, User, UserRepository};
use crate::shared::error::AppError;

/// Database row representation matching the users table schema.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    nickname: String,
    role: String,
    password_hash: Option<String>,
    refresh_token_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            nickname: row.nickname,
            role: Role::from_str(&row.role),
            password_hash: row.password_hash,
            refresh_token_hash: row.refresh_token_hash,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, nickname, role, password_hash, refresh_token_hash, created_at";

/// PostgreSQL user repository bound to an open transaction.
pub struct PgUserRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgUserRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    async fn find_one_by(&mut self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository<'_> {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one_by("email", email).await
    }

    async fn find_by_nickname(&mut self, nickname: &str) -> Result<Option<User>, AppError> {
        self.find_one_by("nickname", nickname).await
    }

    async fn find_by_refresh_token_hash(&mut self, hash: &str) -> Result<Option<User>, AppError> {
        self.find_one_by("refresh_token_hash", hash).await
    }

    async fn create(&mut self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, nickname, role, password_hash, refresh_token_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.nickname)
            .bind(user.role.as_str())
            .bind(&user.password_hash)
            .bind(&user.refresh_token_hash)
            .bind(user.created_at)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Email or nickname already in use".to_string())
                }
                _ => AppError::Database(e),
            })?;

        Ok(row.into())
    }

    async fn update_refresh_token_hash(
        &mut self,
        id: i64,
        hash: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    async fn link_social_profile(
        &mut self,
        user_id: i64,
        profile: &SocialProfile,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO social_accounts (provider, social_id, user_id, social_email)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&profile.provider)
        .bind(&profile.social_id)
        .bind(user_id)
        .bind(&profile.social_email)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Social account already linked".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(())
    }
}
