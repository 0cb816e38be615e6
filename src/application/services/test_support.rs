//! Fixtures shared by the service tests.

use std::sync::Arc;

use crate::domain::{ChatRoom, Follower, Host, User};
use crate::infrastructure::database::UnitOfWork;
use crate::infrastructure::memory::MemoryUnitOfWork;
use crate::shared::snowflake::SnowflakeGenerator;

use super::{ChatRoomParticipantServiceImpl, ChatRoomServiceImpl};

pub(crate) struct TestContext {
    pub uow: Arc<dyn UnitOfWork>,
    pub ids: Arc<SnowflakeGenerator>,
    pub participants: Arc<ChatRoomParticipantServiceImpl>,
    pub chat_rooms: ChatRoomServiceImpl,
}

impl TestContext {
    pub fn new() -> Self {
        let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryUnitOfWork::new());
        let ids = Arc::new(SnowflakeGenerator::default());
        let participants = Arc::new(ChatRoomParticipantServiceImpl::new(
            uow.clone(),
            ids.clone(),
        ));
        let chat_rooms = ChatRoomServiceImpl::new(uow.clone(), participants.clone(), ids.clone());

        Self {
            uow,
            ids,
            participants,
            chat_rooms,
        }
    }
}

/// Insert a user with its host (`id + 1000`) and follower (`id + 2000`) records.
pub(crate) async fn create_user(ctx: &TestContext, id: i64) {
    let mut tx = ctx.uow.begin().await.unwrap();
    tx.users()
        .create(&User {
            id,
            email: format!("user{}@example.com", id),
            nickname: format!("user{}", id),
            ..Default::default()
        })
        .await
        .unwrap();
    tx.hosts()
        .save_host(&Host {
            id: id + 1000,
            user_id: id,
        })
        .await
        .unwrap();
    tx.hosts()
        .save_follower(&Follower {
            id: id + 2000,
            user_id: id,
        })
        .await
        .unwrap();
    tx.commit().await.unwrap();
}

/// Insert an empty room without seating anyone.
pub(crate) async fn create_room_row(ctx: &TestContext, room_id: i64, manager: i64, max: i32) {
    let mut tx = ctx.uow.begin().await.unwrap();
    let room = ChatRoom::new(room_id, manager, "room".into(), max, vec![], "MOVIE".into());
    tx.chat_rooms().save(&room).await.unwrap();
    tx.commit().await.unwrap();
}

pub(crate) async fn occupancy(ctx: &TestContext, room_id: i64) -> i32 {
    let mut tx = ctx.uow.begin().await.unwrap();
    let room = tx.chat_rooms().find_by_id(room_id).await.unwrap().unwrap();
    room.current_user_count
}

pub(crate) async fn participant_count(ctx: &TestContext, room_id: i64) -> i64 {
    let mut tx = ctx.uow.begin().await.unwrap();
    let count = tx.participants().count_by_room(room_id).await.unwrap();
    count
}

pub(crate) async fn room_count(ctx: &TestContext) -> usize {
    let mut tx = ctx.uow.begin().await.unwrap();
    let filter = crate::domain::ChatRoomFilter {
        size: u32::MAX,
        ..Default::default()
    };
    let listings = tx.chat_rooms().search(&filter, 0).await.unwrap();
    listings.len()
}
