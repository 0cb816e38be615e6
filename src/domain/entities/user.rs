//! User entity and repository trait.
//!
//! Maps to the `users` and `social_accounts` tables in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// User role matching database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Signed up with email and password
    #[default]
    User,
    /// Signed up through a social provider
    Social,
    Admin,
}

impl Role {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SOCIAL" => Self::Social,
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Social => "SOCIAL",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - nickname: VARCHAR(32) NOT NULL UNIQUE
/// - role: VARCHAR(20) NOT NULL DEFAULT 'USER'
/// - password_hash: VARCHAR(255) NULL (social users have none)
/// - refresh_token_hash: VARCHAR(64) NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Email address (unique)
    pub email: String,

    /// Nickname (2-32 characters, unique)
    pub nickname: String,

    pub role: Role,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// SHA-256 of the currently valid refresh token
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the account can log in with a password.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            email: String::new(),
            nickname: String::new(),
            role: Role::default(),
            password_hash: None,
            refresh_token_hash: None,
            created_at: Utc::now(),
        }
    }
}

/// Social account linked to a user.
///
/// Maps to the `social_accounts` table:
/// - provider: VARCHAR(20) NOT NULL (composite PK)
/// - social_id: VARCHAR(255) NOT NULL (composite PK)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - social_email: VARCHAR(255) NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub provider: String,
    pub social_id: String,
    pub social_email: String,
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, AppError>;

    /// Find a user by nickname.
    async fn find_by_nickname(&mut self, nickname: &str) -> Result<Option<User>, AppError>;

    /// Find the user owning a refresh token hash.
    async fn find_by_refresh_token_hash(&mut self, hash: &str) -> Result<Option<User>, AppError>;

    /// Create a new user.
    async fn create(&mut self, user: &User) -> Result<User, AppError>;

    /// Replace (or clear) the stored refresh token hash.
    async fn update_refresh_token_hash(
        &mut self,
        id: i64,
        hash: Option<&str>,
    ) -> Result<(), AppError>;

    /// Link a social provider account to a user.
    async fn link_social_profile(
        &mut self,
        user_id: i64,
        profile: &SocialProfile,
    ) -> Result<(), AppError>;
}
