//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the chat
//! room service. All entities map directly to their corresponding database
//! tables.
//!
//! ## Core Entities
//!
//! - **ChatRoom**: A room with a capacity and a live occupancy counter
//! - **ChatRoomParticipant**: A user's membership in a room
//! - **User**: User account (local or social)
//! - **Category**: Room category catalog
//!
//! ## Supporting Entities
//!
//! - **Host / Follower / HostFollowStatus**: Host subscriptions
//! - **Terms / TermsAgreement**: Sign-up terms and agreement history
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. Repositories are handed out by a transaction context (see
//! `infrastructure::database::unit_of_work`) so every call runs inside the
//! caller's transaction.

mod category;
mod chat_room;
mod host;
mod participant;
mod terms;
mod user;

pub use category::{Category, CategoryRepository};
pub use chat_room::{ChatRoom, ChatRoomFilter, ChatRoomListing, ChatRoomOrder, ChatRoomRepository};
pub use host::{Follower, Host, HostFollowStatus, HostRepository};
pub use participant::{ChatRoomParticipant, ChatRoomParticipantRepository};
pub use terms::{Terms, TermsAgreement, TermsRepository};
pub use user::{Role, SocialProfile, User, UserRepository};
