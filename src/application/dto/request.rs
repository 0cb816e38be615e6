//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::{
    CreateChatRoomDto, SignUpDto, SocialSignUpDto, TermsAgreementDto,
};
use crate::domain::SocialProfile;

/// Answer to one terms document
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TermsAgreementRequest {
    pub terms_id: i64,
    pub agreed: bool,
}

impl From<TermsAgreementRequest> for TermsAgreementDto {
    fn from(req: TermsAgreementRequest) -> Self {
        Self {
            terms_id: req.terms_id,
            agreed: req.agreed,
        }
    }
}

/// Local sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 2, max = 32, message = "Nickname must be 2-32 characters"))]
    pub nickname: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub terms_agreements: Vec<TermsAgreementRequest>,
}

impl From<SignUpRequest> for SignUpDto {
    fn from(req: SignUpRequest) -> Self {
        Self {
            email: req.email,
            nickname: req.nickname,
            password: req.password,
            terms_agreements: req.terms_agreements.into_iter().map(Into::into).collect(),
        }
    }
}

/// Social account details from the provider
#[derive(Debug, Deserialize, Validate)]
pub struct SocialProfileRequest {
    #[validate(length(min = 1, max = 20, message = "Provider must be 1-20 characters"))]
    pub provider: String,

    #[validate(length(min = 1, max = 255, message = "Social id is required"))]
    pub social_id: String,

    #[validate(email(message = "Invalid social email format"))]
    pub social_email: String,
}

/// Social sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SocialSignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 2, max = 32, message = "Nickname must be 2-32 characters"))]
    pub nickname: String,

    #[validate(nested)]
    pub social_profile: SocialProfileRequest,

    #[serde(default)]
    pub terms_agreements: Vec<TermsAgreementRequest>,
}

impl From<SocialSignUpRequest> for SocialSignUpDto {
    fn from(req: SocialSignUpRequest) -> Self {
        Self {
            email: req.email,
            nickname: req.nickname,
            social_profile: SocialProfile {
                provider: req.social_profile.provider,
                social_id: req.social_profile.social_id,
                social_email: req.social_profile.social_email,
            },
            terms_agreements: req.terms_agreements.into_iter().map(Into::into).collect(),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Create chat room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatRoomRequest {
    #[validate(length(min = 1, max = 50, message = "Category code is required"))]
    pub category_code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 1000, message = "Capacity must be 1-1000"))]
    pub max_user_count: i32,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 tags"))]
    pub tags: Vec<String>,
}

impl From<CreateChatRoomRequest> for CreateChatRoomDto {
    fn from(req: CreateChatRoomRequest) -> Self {
        Self {
            category_code: req.category_code,
            name: req.name,
            max_user_count: req.max_user_count,
            tags: req.tags,
        }
    }
}

/// Chat room discovery query string
#[derive(Debug, Default, Deserialize)]
pub struct FindChatRoomsQuery {
    pub category_code: Option<String>,
    pub tag: Option<String>,
    /// Zero-based page index
    pub page: Option<u32>,
    pub size: Option<u32>,
}
