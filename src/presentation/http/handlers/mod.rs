//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints, plus the mapping from typed
//! service errors to [`AppError`] responses.

pub mod auth;
pub mod category;
pub mod chat_room;
pub mod health;
pub mod host;
pub mod user;

use crate::application::services::{AuthError, ChatRoomError, HostError, UserError};
use crate::shared::error::AppError;

impl From<ChatRoomError> for AppError {
    fn from(err: ChatRoomError) -> Self {
        match err {
            ChatRoomError::RoomNotFound => AppError::NotFound("Chat room not found".into()),
            ChatRoomError::UserNotFound => AppError::NotFound("User not found".into()),
            ChatRoomError::CategoryNotFound(code) => {
                AppError::NotFound(format!("Category not found: {}", code))
            }
            ChatRoomError::RoomFull(id) => AppError::CapacityExceeded(id),
            ChatRoomError::DuplicateMembership {
                user_id,
                chat_room_id,
            } => AppError::DuplicateMembership {
                user_id,
                chat_room_id,
            },
            ChatRoomError::NotMember {
                user_id,
                chat_room_id,
            } => AppError::NotMember {
                user_id,
                chat_room_id,
            },
            ChatRoomError::InvariantViolation(msg) => AppError::InvariantViolation(msg),
            ChatRoomError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound("User not found".into()),
            e @ (UserError::EmailAlreadyInUse | UserError::NicknameAlreadyInUse) => {
                AppError::Conflict(e.to_string())
            }
            e @ (UserError::SocialEmailMismatch | UserError::RequiredTermsNotAgreed) => {
                AppError::BadRequest(e.to_string())
            }
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken | AuthError::UserNotFound => {
                AppError::Unauthorized("Invalid token".into())
            }
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            e @ (HostError::HostNotFound | HostError::FollowerNotFound) => {
                AppError::NotFound(e.to_string())
            }
            e @ (HostError::AlreadyFollowing | HostError::NotFollowing) => {
                AppError::Conflict(e.to_string())
            }
            e @ HostError::CannotFollowSelf => AppError::BadRequest(e.to_string()),
            HostError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Parse a Snowflake id from a path segment
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use test_case::test_case;

    #[test_case(ChatRoomError::RoomNotFound, StatusCode::NOT_FOUND, 10001 ; "room not found")]
    #[test_case(ChatRoomError::CategoryNotFound("X".into()), StatusCode::NOT_FOUND, 10001 ; "category not found")]
    #[test_case(ChatRoomError::RoomFull(1), StatusCode::CONFLICT, 20001 ; "room full")]
    #[test_case(ChatRoomError::DuplicateMembership { user_id: 2, chat_room_id: 1 }, StatusCode::CONFLICT, 20002 ; "duplicate membership")]
    #[test_case(ChatRoomError::NotMember { user_id: 2, chat_room_id: 1 }, StatusCode::CONFLICT, 20003 ; "not member")]
    #[test_case(ChatRoomError::InvariantViolation("x".into()), StatusCode::INTERNAL_SERVER_ERROR, 10000 ; "invariant")]
    fn test_chat_room_error_status(err: ChatRoomError, status: StatusCode, code: u16) {
        assert_eq!(AppError::from(err).status_and_code(), (status, code));
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::InvalidToken,
        ] {
            let (status, _) = AppError::from(err).status_and_code();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("123", "room").unwrap(), 123);
        assert!(parse_id("abc", "room").is_err());
    }
}
