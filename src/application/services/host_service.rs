//! Host Service
//!
//! Handles following and unfollowing hosts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::HostFollowStatus;
use crate::infrastructure::database::{complete, TransactionContext, UnitOfWork};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Host service trait
#[async_trait]
pub trait HostService: Send + Sync {
    /// Follow a host
    async fn follow(&self, host_id: i64, user_id: i64) -> Result<FollowDto, HostError>;

    /// Stop following a host
    async fn unfollow(&self, host_id: i64, user_id: i64) -> Result<(), HostError>;

    /// Whether a user follows a host
    async fn is_following(&self, host_id: i64, user_id: i64) -> Result<bool, HostError>;

    /// Hosts a user follows
    async fn following(&self, user_id: i64) -> Result<Vec<FollowDto>, HostError>;

    /// Followers of the host owned by a user
    async fn followers(&self, user_id: i64) -> Result<Vec<FollowDto>, HostError>;
}

/// Follow status data transfer object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowDto {
    pub host_id: String,
    pub host_user_id: String,
    pub follower_user_id: String,
    pub followed_at: String,
}

impl From<HostFollowStatus> for FollowDto {
    fn from(status: HostFollowStatus) -> Self {
        Self {
            host_id: status.host_id.to_string(),
            host_user_id: status.host_user_id.to_string(),
            follower_user_id: status.follower_user_id.to_string(),
            followed_at: status.followed_at.to_rfc3339(),
        }
    }
}

/// Host service errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Host not found")]
    HostNotFound,

    #[error("Follower not found")]
    FollowerNotFound,

    #[error("Already following this host")]
    AlreadyFollowing,

    #[error("Not following this host")]
    NotFollowing,

    #[error("Cannot follow yourself")]
    CannotFollowSelf,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for HostError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Conflict(_) => HostError::AlreadyFollowing,
            other => HostError::Internal(other.to_string()),
        }
    }
}

/// HostService implementation
pub struct HostServiceImpl {
    uow: Arc<dyn UnitOfWork>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl HostServiceImpl {
    pub fn new(uow: Arc<dyn UnitOfWork>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self { uow, id_generator }
    }

    async fn follow_in(
        &self,
        tx: &mut dyn TransactionContext,
        host_id: i64,
        user_id: i64,
    ) -> Result<FollowDto, HostError> {
        let host = tx
            .hosts()
            .find_host_by_id(host_id)
            .await?
            .ok_or(HostError::HostNotFound)?;
        if host.user_id == user_id {
            return Err(HostError::CannotFollowSelf);
        }

        let follower = tx
            .hosts()
            .find_follower_by_user_id(user_id)
            .await?
            .ok_or(HostError::FollowerNotFound)?;

        if tx
            .hosts()
            .exists_by_host_id_and_follower_user_id(host_id, user_id)
            .await?
        {
            return Err(HostError::AlreadyFollowing);
        }

        let status = HostFollowStatus {
            id: self.id_generator.generate(),
            host_id: host.id,
            follower_id: follower.id,
            host_user_id: host.user_id,
            follower_user_id: user_id,
            followed_at: Utc::now(),
        };
        let status = tx.hosts().save_follow_status(&status).await?;

        Ok(status.into())
    }

    async fn unfollow_in(
        &self,
        tx: &mut dyn TransactionContext,
        host_id: i64,
        user_id: i64,
    ) -> Result<(), HostError> {
        if tx.hosts().find_host_by_id(host_id).await?.is_none() {
            return Err(HostError::HostNotFound);
        }
        let follower = tx
            .hosts()
            .find_follower_by_user_id(user_id)
            .await?
            .ok_or(HostError::FollowerNotFound)?;

        if !tx.hosts().delete_follow_status(host_id, follower.id).await? {
            return Err(HostError::NotFollowing);
        }
        Ok(())
    }
}

#[async_trait]
impl HostService for HostServiceImpl {
    async fn follow(&self, host_id: i64, user_id: i64) -> Result<FollowDto, HostError> {
        let mut tx = self.uow.begin().await?;
        let result = self.follow_in(tx.as_mut(), host_id, user_id).await;
        let follow = complete(tx, result).await?;

        tracing::info!(host_id, user_id, "Host followed");
        Ok(follow)
    }

    async fn unfollow(&self, host_id: i64, user_id: i64) -> Result<(), HostError> {
        let mut tx = self.uow.begin().await?;
        let result = self.unfollow_in(tx.as_mut(), host_id, user_id).await;
        complete(tx, result).await?;

        tracing::info!(host_id, user_id, "Host unfollowed");
        Ok(())
    }

    async fn is_following(&self, host_id: i64, user_id: i64) -> Result<bool, HostError> {
        let mut tx = self.uow.begin().await?;
        let exists = tx
            .hosts()
            .exists_by_host_id_and_follower_user_id(host_id, user_id)
            .await?;
        Ok(exists)
    }

    async fn following(&self, user_id: i64) -> Result<Vec<FollowDto>, HostError> {
        let mut tx = self.uow.begin().await?;
        let statuses = tx.hosts().find_by_follower_user_id(user_id).await?;
        Ok(statuses.into_iter().map(FollowDto::from).collect())
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<FollowDto>, HostError> {
        let mut tx = self.uow.begin().await?;
        let statuses = tx.hosts().find_by_host_user_id(user_id).await?;
        Ok(statuses.into_iter().map(FollowDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{create_user, TestContext};
    use pretty_assertions::assert_eq;

    // create_user gives user N host N + 1000 and follower N + 2000
    async fn setup() -> (TestContext, HostServiceImpl) {
        let ctx = TestContext::new();
        for id in 1..=3 {
            create_user(&ctx, id).await;
        }
        let service = HostServiceImpl::new(ctx.uow.clone(), ctx.ids.clone());
        (ctx, service)
    }

    #[tokio::test]
    async fn test_follow_and_list() {
        let (_ctx, service) = setup().await;

        service.follow(1001, 2).await.unwrap();
        service.follow(1001, 3).await.unwrap();
        service.follow(1003, 2).await.unwrap();

        assert!(service.is_following(1001, 2).await.unwrap());
        assert!(!service.is_following(1002, 1).await.unwrap());

        let mut following: Vec<String> = service
            .following(2)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.host_id)
            .collect();
        following.sort();
        assert_eq!(following, vec!["1001".to_string(), "1003".to_string()]);

        let mut followers: Vec<String> = service
            .followers(1)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.follower_user_id)
            .collect();
        followers.sort();
        assert_eq!(followers, vec!["2".to_string(), "3".to_string()]);
    }

    #[tokio::test]
    async fn test_follow_twice() {
        let (_ctx, service) = setup().await;
        service.follow(1001, 2).await.unwrap();

        assert!(matches!(
            service.follow(1001, 2).await,
            Err(HostError::AlreadyFollowing)
        ));
        assert_eq!(service.followers(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_rejections() {
        let (_ctx, service) = setup().await;

        assert!(matches!(
            service.follow(1001, 1).await,
            Err(HostError::CannotFollowSelf)
        ));
        assert!(matches!(
            service.follow(4242, 1).await,
            Err(HostError::HostNotFound)
        ));
        assert!(matches!(
            service.follow(1001, 99).await,
            Err(HostError::FollowerNotFound)
        ));
    }

    #[tokio::test]
    async fn test_unfollow() {
        let (_ctx, service) = setup().await;
        service.follow(1001, 2).await.unwrap();

        service.unfollow(1001, 2).await.unwrap();
        assert!(!service.is_following(1001, 2).await.unwrap());

        assert!(matches!(
            service.unfollow(1001, 2).await,
            Err(HostError::NotFollowing)
        ));
    }
}
