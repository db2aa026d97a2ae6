//! Allowed domain repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{AllowedDomain, AllowedDomainId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[async_trait]
pub trait AllowedDomainRepository: Send + Sync + Debug {
    /// All domains of an account, newest first
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<AllowedDomain>, DomainError>;

    /// Store a domain, failing with a conflict when the account already has it
    async fn create(&self, domain: AllowedDomain) -> Result<AllowedDomain, DomainError>;

    /// Delete a domain owned by `user_id`. Returns false when no such domain exists.
    async fn delete(&self, user_id: &UserId, id: &AllowedDomainId) -> Result<bool, DomainError>;
}
