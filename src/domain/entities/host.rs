//! Host / follower subscription entities and repository trait.
//!
//! Every user owns one host record (the side that can be followed) and one
//! follower record (the side that follows). A follow is a row in
//! `host_follow_statuses`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maps to `hosts(id BIGINT PK, user_id BIGINT UNIQUE REFERENCES users(id))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: i64,
    pub user_id: i64,
}

/// Maps to `followers(id BIGINT PK, user_id BIGINT UNIQUE REFERENCES users(id))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub id: i64,
    pub user_id: i64,
}

/// Subscription of a follower to a host.
///
/// Maps to `host_follow_statuses`:
/// - id: BIGINT PRIMARY KEY
/// - host_id: BIGINT NOT NULL REFERENCES hosts(id)
/// - follower_id: BIGINT NOT NULL REFERENCES followers(id)
/// - followed_at: TIMESTAMPTZ NOT NULL
/// - UNIQUE (host_id, follower_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFollowStatus {
    pub id: i64,
    pub host_id: i64,
    pub follower_id: i64,
    /// User behind `host_id`
    pub host_user_id: i64,
    /// User behind `follower_id`
    pub follower_user_id: i64,
    pub followed_at: DateTime<Utc>,
}

#[async_trait]
pub trait HostRepository: Send {
    async fn save_host(&mut self, host: &Host) -> Result<Host, AppError>;

    async fn save_follower(&mut self, follower: &Follower) -> Result<Follower, AppError>;

    async fn find_host_by_id(&mut self, host_id: i64) -> Result<Option<Host>, AppError>;

    async fn find_host_by_user_id(&mut self, user_id: i64) -> Result<Option<Host>, AppError>;

    async fn find_follower_by_user_id(&mut self, user_id: i64)
        -> Result<Option<Follower>, AppError>;

    /// Insert a follow row. Fails with [`AppError::Conflict`] if it already exists.
    async fn save_follow_status(&mut self, status: &HostFollowStatus)
        -> Result<HostFollowStatus, AppError>;

    /// Delete a follow row, returning whether one existed.
    async fn delete_follow_status(&mut self, host_id: i64, follower_id: i64)
        -> Result<bool, AppError>;

    async fn exists_by_host_id_and_follower_user_id(
        &mut self,
        host_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError>;

    /// Hosts followed by a user.
    async fn find_by_follower_user_id(&mut self, user_id: i64)
        -> Result<Vec<HostFollowStatus>, AppError>;

    /// Followers of the host owned by a user.
    async fn find_by_host_user_id(&mut self, user_id: i64)
        -> Result<Vec<HostFollowStatus>, AppError>;
}
