//! Terms of service entities and repository trait.
//!
//! Maps to the `terms` and `terms_agreements` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A terms document a user may have to agree to at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub required: bool,
}

/// One recorded agreement of a user to a terms document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsAgreement {
    pub user_id: i64,
    pub terms_id: i64,
    pub agreed: bool,
    pub agreed_at: DateTime<Utc>,
}

#[async_trait]
pub trait TermsRepository: Send {
    /// All terms, required ones included.
    async fn find_all(&mut self) -> Result<Vec<Terms>, AppError>;

    /// Persist the agreement history of a user.
    async fn save_agreements(&mut self, agreements: &[TermsAgreement]) -> Result<(), AppError>;

    async fn find_agreements_by_user(&mut self, user_id: i64)
        -> Result<Vec<TermsAgreement>, AppError>;
}
