//! Terms Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::{Terms, TermsAgreement, TermsRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct TermsRow {
    id: i64,
    code: String,
    title: String,
    required: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct TermsAgreementRow {
    user_id: i64,
    terms_id: i64,
    agreed: bool,
    agreed_at: DateTime<Utc>,
}

/// PostgreSQL terms repository bound to an open transaction.
pub struct PgTermsRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgTermsRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TermsRepository for PgTermsRepository<'_> {
    async fn find_all(&mut self) -> Result<Vec<Terms>, AppError> {
        let rows = sqlx::query_as::<_, TermsRow>(
            "SELECT id, code, title, required FROM terms ORDER BY id ASC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Terms {
                id: r.id,
                code: r.code,
                title: r.title,
                required: r.required,
            })
            .collect())
    }

    async fn save_agreements(&mut self, agreements: &[TermsAgreement]) -> Result<(), AppError> {
        for agreement in agreements {
            sqlx::query(
                r#"
                INSERT INTO terms_agreements (user_id, terms_id, agreed, agreed_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, terms_id)
                DO UPDATE SET agreed = EXCLUDED.agreed, agreed_at = EXCLUDED.agreed_at
                "#,
            )
            .bind(agreement.user_id)
            .bind(agreement.terms_id)
            .bind(agreement.agreed)
            .bind(agreement.agreed_at)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::NotFound(format!("Terms {} not found", agreement.terms_id))
                }
                _ => AppError::Database(e),
            })?;
        }

        Ok(())
    }

    async fn find_agreements_by_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<TermsAgreement>, AppError> {
        let rows = sqlx::query_as::<_, TermsAgreementRow>(
            r#"
            SELECT user_id, terms_id, agreed, agreed_at
            FROM terms_agreements
            WHERE user_id = $1
            ORDER BY terms_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TermsAgreement {
                user_id: r.user_id,
                terms_id: r.terms_id,
                agreed: r.agreed,
                agreed_at: r.agreed_at,
            })
            .collect())
    }
}
