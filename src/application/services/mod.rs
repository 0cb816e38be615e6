//! Application Services
//!
//! Business logic services that coordinate domain operations. Each service
//! opens a transaction through the unit of work, runs its repository calls
//! inside it and commits or rolls back as one unit.
//!
//! ## Available Services
//!
//! - **ChatRoomService**: Room creation and discovery
//! - **ChatRoomParticipantService**: Joining and leaving rooms
//! - **CategoryService**: Category catalog
//! - **AuthService**: Login, JWT tokens, refresh rotation
//! - **UserService**: Sign-up and profile lookup
//! - **HostService**: Host subscriptions

pub mod auth_service;
pub mod category_service;
pub mod chat_room_service;
pub mod host_service;
pub mod participant_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};

pub use category_service::{CategoryService, CategoryServiceImpl};

pub use chat_room_service::{
    CategoryDto, ChatRoomError, ChatRoomService, ChatRoomServiceImpl, ChatRoomSummaryDto,
    CreateChatRoomDto, FindChatRoomsDto,
};

pub use participant_service::{ChatRoomParticipantService, ChatRoomParticipantServiceImpl};

pub use user_service::{
    SignUpDto, SocialSignUpDto, TermsAgreementDto, UserDto, UserError, UserService,
    UserServiceImpl,
};

pub use host_service::{FollowDto, HostError, HostService, HostServiceImpl};
