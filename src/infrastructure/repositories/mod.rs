//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! Each repository borrows the connection of an open transaction, so it is
//! created through a `PgTransactionContext` rather than from the pool:
//!
//! ```rust,ignore
//! let mut tx = uow.begin().await?;
//! let room = tx.chat_rooms().find_by_id(room_id).await?;
//! tx.participants().save(&participant).await?;
//! tx.commit().await?;
//! ```
//!
//! ## Available Repositories
//!
//! - **ChatRoomRepository** - Rooms, atomic occupancy counter, discovery search
//! - **ChatRoomParticipantRepository** - Room membership rows
//! - **UserRepository** - User accounts and linked social profiles
//! - **CategoryRepository** - Room category catalog
//! - **TermsRepository** - Terms and agreement history
//! - **HostRepository** - Hosts, followers and follow statuses

pub mod category_repository;
pub mod chat_room_repository;
pub mod host_repository;
pub mod participant_repository;
pub mod terms_repository;
pub mod user_repository;

pub use category_repository::PgCategoryRepository;
pub use chat_room_repository::PgChatRoomRepository;
pub use host_repository::PgHostRepository;
pub use participant_repository::PgChatRoomParticipantRepository;
pub use terms_repository::PgTermsRepository;
pub use user_repository::PgUserRepository;
