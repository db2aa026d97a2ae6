//! Allowed domain management and origin checks

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::allowed_domain::{
    normalize_domain, origin_host, AllowedDomain, AllowedDomainId, AllowedDomainRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Why a request origin was refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OriginRejection {
    #[error("Origin header is required")]
    Missing,

    #[error("Invalid origin header")]
    Invalid,

    #[error("Domain not allowed")]
    NotAllowed { host: String },
}

/// Result of checking a request origin against an account's allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginCheck {
    /// The account has no allowed domains configured
    Unrestricted,
    Allowed { host: String },
    Rejected(OriginRejection),
}

#[derive(Debug, Clone)]
pub struct AllowedDomainService {
    repository: Arc<dyn AllowedDomainRepository>,
}

impl AllowedDomainService {
    pub fn new(repository: Arc<dyn AllowedDomainRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<AllowedDomain>, DomainError> {
        self.repository.list_by_user(user_id).await
    }

    /// Add a domain to an account's allow-list
    pub async fn add(&self, user_id: &UserId, domain: &str) -> Result<AllowedDomain, DomainError> {
        let domain = normalize_domain(domain).map_err(|e| DomainError::validation(e.to_string()))?;

        let created = self
            .repository
            .create(AllowedDomain::new(*user_id, domain))
            .await?;

        info!(user_id = %user_id, domain = %created.domain, "Added allowed domain");
        Ok(created)
    }

    /// Remove a domain. Unknown ids and domains owned by other accounts are both "not found".
    pub async fn remove(&self, user_id: &UserId, id: &str) -> Result<(), DomainError> {
        let not_found = || DomainError::not_found("Domain not found");

        let id = AllowedDomainId::try_from(id).map_err(|_| not_found())?;

        if !self.repository.delete(user_id, &id).await? {
            return Err(not_found());
        }

        info!(user_id = %user_id, domain_id = %id, "Removed allowed domain");
        Ok(())
    }

    /// Check a request's `Origin` header against the account's allow-list
    pub async fn check_origin(
        &self,
        user_id: &UserId,
        origin: Option<&str>,
    ) -> Result<OriginCheck, DomainError> {
        let domains = self.repository.list_by_user(user_id).await?;

        if domains.is_empty() {
            return Ok(OriginCheck::Unrestricted);
        }

        let origin = match origin.map(str::trim).filter(|o| !o.is_empty()) {
            Some(o) => o,
            None => return Ok(OriginCheck::Rejected(OriginRejection::Missing)),
        };

        let host = match origin_host(origin) {
            Some(h) => h,
            None => return Ok(OriginCheck::Rejected(OriginRejection::Invalid)),
        };

        if domains.iter().any(|d| d.matches(&host)) {
            Ok(OriginCheck::Allowed { host })
        } else {
            debug!(user_id = %user_id, host = %host, "Origin not in allow-list");
            Ok(OriginCheck::Rejected(OriginRejection::NotAllowed { host }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::allowed_domain::InMemoryAllowedDomainRepository;

    fn create_service() -> AllowedDomainService {
        AllowedDomainService::new(Arc::new(InMemoryAllowedDomainRepository::new()))
    }

    #[tokio::test]
    async fn test_add_normalizes() {
        let service = create_service();
        let user = UserId::new();

        let domain = service.add(&user, "  Example.COM ").await.unwrap();
        assert_eq!(domain.domain, "example.com");
    }

    #[tokio::test]
    async fn test_add_validation_messages() {
        let service = create_service();
        let user = UserId::new();

        let err = service.add(&user, "").await.unwrap_err();
        assert_eq!(err.message(), "Domain is required");

        let err = service.add(&user, "https://example.com/path").await.unwrap_err();
        assert_eq!(err.message(), "Invalid domain format");
    }

    #[tokio::test]
    async fn test_add_duplicate() {
        let service = create_service();
        let user = UserId::new();

        service.add(&user, "example.com").await.unwrap();
        let err = service.add(&user, "EXAMPLE.com").await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(err.message(), "Domain already exists for this user");
    }

    #[tokio::test]
    async fn test_remove() {
        let service = create_service();
        let user = UserId::new();
        let domain = service.add(&user, "example.com").await.unwrap();

        let err = service.remove(&UserId::new(), &domain.id.to_string()).await.unwrap_err();
        assert_eq!(err.message(), "Domain not found");

        let err = service.remove(&user, "not-a-uuid").await.unwrap_err();
        assert_eq!(err.message(), "Domain not found");

        service.remove(&user, &domain.id.to_string()).await.unwrap();
        assert!(service.list(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_origin_unrestricted_without_domains() {
        let service = create_service();
        let user = UserId::new();

        let check = service.check_origin(&user, None).await.unwrap();
        assert_eq!(check, OriginCheck::Unrestricted);
    }

    #[tokio::test]
    async fn test_check_origin_rules() {
        let service = create_service();
        let user = UserId::new();
        service.add(&user, "example.com").await.unwrap();

        assert_eq!(
            service.check_origin(&user, None).await.unwrap(),
            OriginCheck::Rejected(OriginRejection::Missing)
        );
        assert_eq!(
            service.check_origin(&user, Some("garbage")).await.unwrap(),
            OriginCheck::Rejected(OriginRejection::Invalid)
        );
        assert_eq!(
            service
                .check_origin(&user, Some("https://evil.io"))
                .await
                .unwrap(),
            OriginCheck::Rejected(OriginRejection::NotAllowed {
                host: "evil.io".to_string()
            })
        );
        assert_eq!(
            service
                .check_origin(&user, Some("https://app.example.com"))
                .await
                .unwrap(),
            OriginCheck::Allowed {
                host: "app.example.com".to_string()
            }
        );
        assert_eq!(
            service
                .check_origin(&user, Some("http://example.com:8080"))
                .await
                .unwrap(),
            OriginCheck::Allowed {
                host: "example.com".to_string()
            }
        );
    }
}
