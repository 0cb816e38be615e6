//! Unit of Work Pattern Implementation
//!
//! Provides transactional boundaries for database operations.
//! Ensures all operations within a business transaction succeed or fail together.
//!
//! A [`TransactionContext`] hands out repositories bound to its transaction, so
//! a service can chain several repository calls (occupancy increment followed by
//! a participant insert, for example) and commit or roll them back as one unit.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    CategoryRepository, ChatRoomParticipantRepository, ChatRoomRepository, HostRepository,
    TermsRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    PgCategoryRepository, PgChatRoomParticipantRepository, PgChatRoomRepository,
    PgHostRepository, PgTermsRepository, PgUserRepository,
};
use crate::shared::error::AppError;

/// Unit of Work trait for managing database transactions.
///
/// This pattern ensures that multiple repository operations can be
/// grouped into a single atomic transaction.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Begin a new transaction.
    async fn begin(&self) -> Result<Box<dyn TransactionContext>, AppError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// An open transaction.
///
/// Dropping a context without calling [`commit`](Self::commit) rolls it back.
#[async_trait]
pub trait TransactionContext: Send {
    fn users(&mut self) -> Box<dyn UserRepository + '_>;

    fn categories(&mut self) -> Box<dyn CategoryRepository + '_>;

    fn terms(&mut self) -> Box<dyn TermsRepository + '_>;

    fn chat_rooms(&mut self) -> Box<dyn ChatRoomRepository + '_>;

    fn participants(&mut self) -> Box<dyn ChatRoomParticipantRepository + '_>;

    fn hosts(&mut self) -> Box<dyn HostRepository + '_>;

    /// Commit the transaction.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    /// Rollback the transaction.
    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

/// Finish a transaction according to the outcome of the work done in it.
///
/// Commits on `Ok` and rolls back on `Err`, handing back the work's result.
/// A failed rollback is logged; the original error still wins.
///
/// # Example
/// ```ignore
/// let mut tx = uow.begin().await?;
/// let result = service.join_in(tx.as_mut(), room_id, user_id).await;
/// complete(tx, result).await
/// ```
pub async fn complete<T, E>(tx: Box<dyn TransactionContext>, result: Result<T, E>) -> Result<T, E>
where
    E: From<AppError>,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}

/// Transaction context that wraps a SQLx transaction.
pub struct PgTransactionContext {
    tx: Transaction<'static, Postgres>,
}

impl PgTransactionContext {
    /// Create a new transaction context.
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl TransactionContext for PgTransactionContext {
    fn users(&mut self) -> Box<dyn UserRepository + '_> {
        Box::new(PgUserRepository::new(&mut self.tx))
    }

    fn categories(&mut self) -> Box<dyn CategoryRepository + '_> {
        Box::new(PgCategoryRepository::new(&mut self.tx))
    }

    fn terms(&mut self) -> Box<dyn TermsRepository + '_> {
        Box::new(PgTermsRepository::new(&mut self.tx))
    }

    fn chat_rooms(&mut self) -> Box<dyn ChatRoomRepository + '_> {
        Box::new(PgChatRoomRepository::new(&mut self.tx))
    }

    fn participants(&mut self) -> Box<dyn ChatRoomParticipantRepository + '_> {
        Box::new(PgChatRoomParticipantRepository::new(&mut self.tx))
    }

    fn hosts(&mut self) -> Box<dyn HostRepository + '_> {
        Box::new(PgHostRepository::new(&mut self.tx))
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await.map_err(AppError::Database)
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await.map_err(AppError::Database)
    }
}

/// PostgreSQL Unit of Work implementation.
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    /// Create from a PgPool directly.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn TransactionContext>, AppError> {
        let tx = self.pool.begin().await.map_err(AppError::Database)?;
        Ok(Box::new(PgTransactionContext::new(tx)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
