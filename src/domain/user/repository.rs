//! User repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::quota::QuotaOutcome;
use crate::domain::DomainError;

/// Repository trait for account storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get an account by its (lower-cased) email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get the account owning the API key with this hash
    async fn get_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Create a new account, failing with a conflict on a duplicate email
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing account
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Atomically reset the monthly counter on rollover and count one request
    /// when the account is still under its plan's limit.
    async fn consume_quota(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<QuotaOutcome, DomainError>;

    /// Count all accounts
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
