//! In-memory allowed domain repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::allowed_domain::{AllowedDomain, AllowedDomainId, AllowedDomainRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAllowedDomainRepository {
    domains: Arc<RwLock<HashMap<AllowedDomainId, AllowedDomain>>>,
}

impl InMemoryAllowedDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AllowedDomainRepository for InMemoryAllowedDomainRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<AllowedDomain>, DomainError> {
        let domains = self.domains.read().await;

        let mut result: Vec<AllowedDomain> = domains
            .values()
            .filter(|d| d.user_id == *user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    async fn create(&self, domain: AllowedDomain) -> Result<AllowedDomain, DomainError> {
        let mut domains = self.domains.write().await;

        let duplicate = domains
            .values()
            .any(|d| d.user_id == domain.user_id && d.domain == domain.domain);

        if duplicate {
            return Err(DomainError::conflict("Domain already exists for this user"));
        }

        domains.insert(domain.id, domain.clone());
        Ok(domain)
    }

    async fn delete(&self, user_id: &UserId, id: &AllowedDomainId) -> Result<bool, DomainError> {
        let mut domains = self.domains.write().await;

        match domains.get(id) {
            Some(domain) if domain.user_id == *user_id => {
                domains.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
