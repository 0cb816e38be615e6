//! Category Service

use std::sync::Arc;

use async_trait::async_trait;

use super::chat_room_service::{CategoryDto, ChatRoomError};
use crate::infrastructure::database::UnitOfWork;

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// All categories ordered by `order_num`
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, ChatRoomError>;
}

pub struct CategoryServiceImpl {
    uow: Arc<dyn UnitOfWork>,
}

impl CategoryServiceImpl {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, ChatRoomError> {
        let mut tx = self.uow.begin().await?;
        let categories = tx.categories().find_all().await?;

        Ok(categories
            .into_iter()
            .map(|c| CategoryDto {
                code: c.code,
                name: c.name,
                order_num: c.order_num,
            })
            .collect())
    }
}
