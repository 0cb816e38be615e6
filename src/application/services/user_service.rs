//! User Service
//!
//! Handles sign-up (local and social) and profile lookup.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::auth_service::hash_password;
use crate::domain::{Follower, Host, Role, SocialProfile, TermsAgreement, User};
use crate::infrastructure::database::{complete, TransactionContext, UnitOfWork};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Sign up with email and password
    async fn sign_up(&self, request: SignUpDto) -> Result<UserDto, UserError>;

    /// Sign up through a social provider
    async fn social_sign_up(&self, request: SocialSignUpDto) -> Result<UserDto, UserError>;

    /// Get user by ID
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError>;
}

/// One answer to a terms document
#[derive(Debug, Clone, Copy)]
pub struct TermsAgreementDto {
    pub terms_id: i64,
    pub agreed: bool,
}

/// Local sign-up request
#[derive(Debug, Clone)]
pub struct SignUpDto {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub terms_agreements: Vec<TermsAgreementDto>,
}

/// Social sign-up request
#[derive(Debug, Clone)]
pub struct SocialSignUpDto {
    pub email: String,
    pub nickname: String,
    pub social_profile: SocialProfile,
    pub terms_agreements: Vec<TermsAgreementDto>,
}

/// User data transfer object
#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub role: String,
    /// Host record other users follow
    pub host_id: Option<String>,
    pub created_at: String,
}

impl UserDto {
    fn from_user(user: User, host: Option<Host>) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            nickname: user.nickname,
            role: user.role.to_string(),
            host_id: host.map(|h| h.id.to_string()),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Nickname already in use")]
    NicknameAlreadyInUse,

    #[error("Social account email does not match the sign-up email")]
    SocialEmailMismatch,

    #[error("Required terms must be agreed to")]
    RequiredTermsNotAgreed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for UserError {
    fn from(err: AppError) -> Self {
        UserError::Internal(err.to_string())
    }
}

/// Account fields common to both sign-up flows
struct NewAccount {
    email: String,
    nickname: String,
    role: Role,
    password_hash: Option<String>,
    terms_agreements: Vec<TermsAgreementDto>,
}

/// UserService implementation
pub struct UserServiceImpl {
    uow: Arc<dyn UnitOfWork>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl UserServiceImpl {
    pub fn new(uow: Arc<dyn UnitOfWork>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self { uow, id_generator }
    }

    async fn validate_sign_up(
        &self,
        tx: &mut dyn TransactionContext,
        email: &str,
        nickname: &str,
        agreements: &[TermsAgreementDto],
    ) -> Result<(), UserError> {
        if tx.users().find_by_email(email).await?.is_some() {
            return Err(UserError::EmailAlreadyInUse);
        }
        if tx.users().find_by_nickname(nickname).await?.is_some() {
            return Err(UserError::NicknameAlreadyInUse);
        }

        let agreed: HashSet<i64> = agreements
            .iter()
            .filter(|a| a.agreed)
            .map(|a| a.terms_id)
            .collect();
        let missing_required = tx
            .terms()
            .find_all()
            .await?
            .iter()
            .any(|t| t.required && !agreed.contains(&t.id));
        if missing_required {
            return Err(UserError::RequiredTermsNotAgreed);
        }

        Ok(())
    }

    /// Persist the user with its host/follower records and agreement history.
    async fn create_account(
        &self,
        tx: &mut dyn TransactionContext,
        account: NewAccount,
    ) -> Result<(User, Host), UserError> {
        let user = User {
            id: self.id_generator.generate(),
            email: account.email,
            nickname: account.nickname,
            role: account.role,
            password_hash: account.password_hash,
            refresh_token_hash: None,
            created_at: Utc::now(),
        };
        let user = tx.users().create(&user).await?;

        let host = Host {
            id: self.id_generator.generate(),
            user_id: user.id,
        };
        let host = tx.hosts().save_host(&host).await?;
        let follower = Follower {
            id: self.id_generator.generate(),
            user_id: user.id,
        };
        tx.hosts().save_follower(&follower).await?;

        let known_terms: HashSet<i64> = tx.terms().find_all().await?.iter().map(|t| t.id).collect();
        let now = Utc::now();
        let agreements: Vec<TermsAgreement> = account
            .terms_agreements
            .iter()
            .filter(|a| known_terms.contains(&a.terms_id))
            .map(|a| TermsAgreement {
                user_id: user.id,
                terms_id: a.terms_id,
                agreed: a.agreed,
                agreed_at: now,
            })
            .collect();
        tx.terms().save_agreements(&agreements).await?;

        Ok((user, host))
    }

    async fn sign_up_in(
        &self,
        tx: &mut dyn TransactionContext,
        request: SignUpDto,
    ) -> Result<UserDto, UserError> {
        self.validate_sign_up(tx, &request.email, &request.nickname, &request.terms_agreements)
            .await?;

        let account = NewAccount {
            email: request.email,
            nickname: request.nickname,
            role: Role::User,
            password_hash: Some(hash_password(&request.password)?),
            terms_agreements: request.terms_agreements,
        };
        let (user, host) = self.create_account(tx, account).await?;

        Ok(UserDto::from_user(user, Some(host)))
    }

    async fn social_sign_up_in(
        &self,
        tx: &mut dyn TransactionContext,
        request: SocialSignUpDto,
    ) -> Result<UserDto, UserError> {
        self.validate_sign_up(tx, &request.email, &request.nickname, &request.terms_agreements)
            .await?;
        if request.email != request.social_profile.social_email {
            return Err(UserError::SocialEmailMismatch);
        }

        let account = NewAccount {
            email: request.email,
            nickname: request.nickname,
            role: Role::Social,
            password_hash: None,
            terms_agreements: request.terms_agreements,
        };
        let (user, host) = self.create_account(tx, account).await?;
        tx.users()
            .link_social_profile(user.id, &request.social_profile)
            .await?;

        Ok(UserDto::from_user(user, Some(host)))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn sign_up(&self, request: SignUpDto) -> Result<UserDto, UserError> {
        let mut tx = self.uow.begin().await?;
        let result = self.sign_up_in(tx.as_mut(), request).await;
        let user = complete(tx, result).await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    async fn social_sign_up(&self, request: SocialSignUpDto) -> Result<UserDto, UserError> {
        let provider = request.social_profile.provider.clone();

        let mut tx = self.uow.begin().await?;
        let result = self.social_sign_up_in(tx.as_mut(), request).await;
        let user = complete(tx, result).await?;

        tracing::info!(user_id = %user.id, provider = %provider, "User signed up through social provider");
        Ok(user)
    }

    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError> {
        let mut tx = self.uow.begin().await?;
        let user = tx.users().find_by_id(user_id).await?.ok_or(UserError::NotFound)?;
        let host = tx.hosts().find_host_by_user_id(user_id).await?;

        Ok(UserDto::from_user(user, host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryUnitOfWork;
    use pretty_assertions::assert_eq;

    fn service() -> (Arc<dyn UnitOfWork>, UserServiceImpl) {
        let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryUnitOfWork::new());
        let service = UserServiceImpl::new(uow.clone(), Arc::new(SnowflakeGenerator::default()));
        (uow, service)
    }

    fn all_terms() -> Vec<TermsAgreementDto> {
        vec![
            TermsAgreementDto { terms_id: 1, agreed: true },
            TermsAgreementDto { terms_id: 2, agreed: true },
            TermsAgreementDto { terms_id: 3, agreed: false },
        ]
    }

    fn sign_up_request(email: &str, nickname: &str) -> SignUpDto {
        SignUpDto {
            email: email.into(),
            nickname: nickname.into(),
            password: "password123".into(),
            terms_agreements: all_terms(),
        }
    }

    fn social_request(email: &str, social_email: &str) -> SocialSignUpDto {
        SocialSignUpDto {
            email: email.into(),
            nickname: "social".into(),
            social_profile: SocialProfile {
                provider: "GOOGLE".into(),
                social_id: "g-123".into(),
                social_email: social_email.into(),
            },
            terms_agreements: all_terms(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_user_host_follower_and_agreements() {
        let (uow, service) = service();

        let user = service
            .sign_up(sign_up_request("alice@example.com", "alice"))
            .await
            .unwrap();
        assert_eq!(user.role, "USER");
        assert!(user.host_id.is_some());

        let user_id: i64 = user.id.parse().unwrap();
        let mut tx = uow.begin().await.unwrap();
        let stored = tx.users().find_by_id(user_id).await.unwrap().unwrap();
        assert!(stored.has_password());
        assert!(tx.hosts().find_follower_by_user_id(user_id).await.unwrap().is_some());
        let agreements = tx.terms().find_agreements_by_user(user_id).await.unwrap();
        assert_eq!(agreements.len(), 3);
        assert!(!agreements[2].agreed);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicates() {
        let (_, service) = service();
        service
            .sign_up(sign_up_request("alice@example.com", "alice"))
            .await
            .unwrap();

        assert!(matches!(
            service.sign_up(sign_up_request("alice@example.com", "other")).await,
            Err(UserError::EmailAlreadyInUse)
        ));
        assert!(matches!(
            service.sign_up(sign_up_request("other@example.com", "alice")).await,
            Err(UserError::NicknameAlreadyInUse)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_requires_required_terms() {
        let (uow, service) = service();
        let mut request = sign_up_request("alice@example.com", "alice");
        request.terms_agreements = vec![TermsAgreementDto { terms_id: 1, agreed: true }];

        assert!(matches!(
            service.sign_up(request).await,
            Err(UserError::RequiredTermsNotAgreed)
        ));

        let mut tx = uow.begin().await.unwrap();
        assert!(tx.users().find_by_email("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_social_sign_up() {
        let (uow, service) = service();

        let user = service
            .social_sign_up(social_request("s@example.com", "s@example.com"))
            .await
            .unwrap();
        assert_eq!(user.role, "SOCIAL");

        let mut tx = uow.begin().await.unwrap();
        let stored = tx.users().find_by_email("s@example.com").await.unwrap().unwrap();
        assert!(!stored.has_password());
    }

    #[tokio::test]
    async fn test_social_email_mismatch_rolls_back() {
        let (uow, service) = service();

        assert!(matches!(
            service
                .social_sign_up(social_request("s@example.com", "other@example.com"))
                .await,
            Err(UserError::SocialEmailMismatch)
        ));

        let mut tx = uow.begin().await.unwrap();
        assert!(tx.users().find_by_email("s@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_user() {
        let (_, service) = service();
        let created = service
            .sign_up(sign_up_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let fetched = service.get_user(created.id.parse().unwrap()).await.unwrap();
        assert_eq!(fetched.nickname, "alice");
        assert_eq!(fetched.host_id, created.host_id);

        assert!(matches!(service.get_user(1).await, Err(UserError::NotFound)));
    }
}
