//! Database Module
//!
//! PostgreSQL connection pool, migrations, and transaction management.

pub mod unit_of_work;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;

pub use unit_of_work::{complete, PgTransactionContext, PgUnitOfWork, TransactionContext, UnitOfWork};

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-constraint violation to `on_unique`, anything else to
/// [`AppError::Database`](crate::shared::error::AppError::Database).
pub fn map_unique_violation<F>(e: sqlx::Error, on_unique: F) -> crate::shared::error::AppError
where
    F: FnOnce() -> crate::shared::error::AppError,
{
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => on_unique(),
        _ => crate::shared::error::AppError::Database(e),
    }
}
