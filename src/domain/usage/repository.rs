//! Usage repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::ApiUsage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Append-only log of admitted lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Stores a usage record
    async fn record(&self, usage: ApiUsage) -> Result<(), DomainError>;

    /// Most recent records of an account, newest first
    async fn list_recent(&self, user_id: &UserId, limit: usize)
        -> Result<Vec<ApiUsage>, DomainError>;

    /// Number of records of an account
    async fn count_by_user(&self, user_id: &UserId) -> Result<usize, DomainError>;
}
