//! Authentication Service
//!
//! Handles login, JWT access tokens and refresh token rotation.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtSettings;
use crate::domain::User;
use crate::infrastructure::database::{complete, UnitOfWork};
use crate::shared::error::AppError;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate user with credentials
    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError>;

    /// Exchange a refresh token for a new token pair, invalidating the old one
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Validate access token and extract user ID
    async fn validate_token(&self, access_token: &str) -> Result<i64, AuthError>;
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    pub jti: String,
}

/// Refresh token claims. Carries no user data; the owner is found by hash.
#[derive(Debug, Serialize, Deserialize)]
struct RefreshClaims {
    exp: i64,
    iat: i64,
    jti: String,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash refresh token for storage
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// AuthService implementation
pub struct AuthServiceImpl {
    uow: Arc<dyn UnitOfWork>,
    jwt_settings: JwtSettings,
}

impl AuthServiceImpl {
    pub fn new(uow: Arc<dyn UnitOfWork>, jwt_settings: JwtSettings) -> Self {
        Self { uow, jwt_settings }
    }

    fn jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: i64) -> Result<AuthTokens, AuthError> {
        let now = Utc::now();
        let key = EncodingKey::from_secret(self.jwt_settings.secret.as_bytes());

        let access_claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes))
                .timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        let refresh_claims = RefreshClaims {
            exp: (now + Duration::days(self.jwt_settings.refresh_token_expiry_days)).timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(Self::jwt_error)
    }

    fn decode_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(Self::jwt_error)
    }

    /// Issue a token pair for `user` and store the refresh token hash.
    async fn issue_tokens(&self, user: &User) -> Result<AuthTokens, AuthError> {
        let tokens = self.generate_tokens(user.id)?;
        let token_hash = hash_refresh_token(&tokens.refresh_token);

        let mut tx = self.uow.begin().await?;
        let result = tx
            .users()
            .update_refresh_token_hash(user.id, Some(&token_hash))
            .await;
        complete(tx, result).await?;

        Ok(tokens)
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let mut tx = self.uow.begin().await?;
        let user = tx.users().find_by_email(email).await?;
        drop(tx);

        let user = user.ok_or(AuthError::InvalidCredentials)?;
        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, password_hash)? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(&user).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(tokens)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        self.decode_refresh_token(refresh_token)?;
        let token_hash = hash_refresh_token(refresh_token);

        let mut tx = self.uow.begin().await?;
        let user = tx.users().find_by_refresh_token_hash(&token_hash).await?;
        drop(tx);

        // A rotated-out token no longer matches any user
        let user = user.ok_or(AuthError::InvalidToken)?;

        self.issue_tokens(&user).await
    }

    async fn validate_token(&self, access_token: &str) -> Result<i64, AuthError> {
        let claims = self.decode_access_token(access_token)?;

        claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryUnitOfWork;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: SECRET.to_string(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 14,
        }
    }

    async fn service_with_user(password: Option<&str>) -> AuthServiceImpl {
        let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryUnitOfWork::new());
        let mut tx = uow.begin().await.unwrap();
        tx.users()
            .create(&User {
                id: 7,
                email: "alice@example.com".into(),
                nickname: "alice".into(),
                password_hash: password.map(|p| hash_password(p).unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        AuthServiceImpl::new(uow, jwt_settings())
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_refresh_token_hash_is_stable_hex() {
        let hash = hash_refresh_token("token");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_refresh_token("token"));
    }

    #[tokio::test]
    async fn test_login_and_validate() {
        let service = service_with_user(Some("password123")).await;

        let tokens = service.login("alice@example.com", "password123").await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 30 * 60);
        assert_eq!(service.validate_token(&tokens.access_token).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let service = service_with_user(Some("password123")).await;

        assert!(matches!(
            service.login("alice@example.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("bob@example.com", "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_social_user_cannot_password_login() {
        let service = service_with_user(None).await;

        assert!(matches!(
            service.login("alice@example.com", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let service = service_with_user(Some("password123")).await;
        let tokens = service.login("alice@example.com", "password123").await.unwrap();

        let rotated = service.refresh_token(&tokens.refresh_token).await.unwrap();
        assert_eq!(service.validate_token(&rotated.access_token).await.unwrap(), 7);

        assert!(matches!(
            service.refresh_token(&tokens.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(service.refresh_token(&rotated.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let service = service_with_user(Some("password123")).await;
        let tokens = service.login("alice@example.com", "password123").await.unwrap();

        assert!(matches!(
            service.validate_token(&tokens.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_expired_access_token() {
        let service = service_with_user(Some("password123")).await;
        let now = Utc::now();
        let claims = Claims {
            sub: "7".into(),
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
            jti: "expired".into(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token).await,
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            service.validate_token("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
