//! Session and password-reset token store.
//!
//! Tokens are opaque UUIDs; possession of an unexpired token is the identity
//! proof. Expired rows are ignored on lookup and reaped opportunistically on
//! each insert.

use crate::error::Result;
use crate::types::Role;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the `sessions` and `password_resets` tables.
#[derive(Clone)]
pub struct SessionStore {
    pool: PgPool,
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue a session token for an account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Database`] if the insert fails.
    pub async fn create_session(
        &self,
        account_id: Uuid,
        role: Role,
        ttl_seconds: u64,
    ) -> Result<Uuid> {
        // Opportunistic reaping keeps the table from growing unbounded.
        sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        let token = Uuid::new_v4();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + Duration::seconds(ttl);
        sqlx::query(
            "INSERT INTO sessions (token, account_id, role, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(token)
        .bind(account_id)
        .bind(role.as_str())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(token)
    }

    /// Validate a session token, returning the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Database`] if the query fails.
    pub async fn validate(&self, token: Uuid) -> Result<Option<(Uuid, Role)>> {
        let row: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT account_id, role FROM sessions
             WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|(account_id, role)| Role::parse(&role).map(|role| (account_id, role))))
    }

    /// Revoke every session of an account (used after a password reset).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Database`] if the delete fails.
    pub async fn revoke_for_account(&self, account_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Issue a password-reset token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Database`] if the insert fails.
    pub async fn create_reset_token(
        &self,
        account_id: Uuid,
        role: Role,
        ttl_seconds: u64,
    ) -> Result<Uuid> {
        sqlx::query("DELETE FROM password_resets WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        let token = Uuid::new_v4();
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + Duration::seconds(ttl);
        sqlx::query(
            "INSERT INTO password_resets (token, account_id, role, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(token)
        .bind(account_id)
        .bind(role.as_str())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(token)
    }

    /// Consume a password-reset token: single use, deleted on success.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Database`] if the query fails.
    pub async fn consume_reset_token(&self, token: Uuid) -> Result<Option<(Uuid, Role)>> {
        let row: Option<(Uuid, String)> = sqlx::query_as(
            "DELETE FROM password_resets
             WHERE token = $1 AND expires_at > NOW()
             RETURNING account_id, role",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|(account_id, role)| Role::parse(&role).map(|role| (account_id, role))))
    }
}
