//! Category Repository Implementation

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::domain::{Category, CategoryRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    code: String,
    name: String,
    order_num: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            code: row.code,
            name: row.name,
            order_num: row.order_num,
        }
    }
}

/// PostgreSQL category repository bound to an open transaction.
pub struct PgCategoryRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgCategoryRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository<'_> {
    async fn find_by_code(&mut self, code: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT code, name, order_num FROM categories WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_all(&mut self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT code, name, order_num FROM categories ORDER BY order_num ASC, code ASC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
