//! Category entity and repository trait.
//!
//! Maps to the `categories` table. Categories are seeded by migration and
//! read-only at runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Chat room category.
///
/// Maps to the `categories` table:
/// - code: VARCHAR(50) PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - order_num: INTEGER NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
    pub order_num: i32,
}

impl Category {
    pub fn new(code: impl Into<String>, name: impl Into<String>, order_num: i32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            order_num,
        }
    }
}

#[async_trait]
pub trait CategoryRepository: Send {
    async fn find_by_code(&mut self, code: &str) -> Result<Option<Category>, AppError>;

    /// All categories ordered by `order_num`.
    async fn find_all(&mut self) -> Result<Vec<Category>, AppError>;
}
