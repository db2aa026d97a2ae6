//! Address lookup service

use std::sync::Arc;

use tracing::debug;

use crate::domain::address::{Address, AddressRepository, PostalCodeQuery, StreetQuery};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct AddressLookupService {
    repository: Arc<dyn AddressRepository>,
}

impl AddressLookupService {
    pub fn new(repository: Arc<dyn AddressRepository>) -> Self {
        Self { repository }
    }

    /// Look up by postal code and house number, failing with "Address not found"
    pub async fn by_postal_code(
        &self,
        postal_code: &str,
        house_number: &str,
    ) -> Result<Address, DomainError> {
        let query = PostalCodeQuery::new(postal_code, house_number)?;
        debug!(postal_code = %query.postal_code, house_number = %query.house_number, "Address lookup");

        self.repository
            .find_by_postal_code(&query)
            .await?
            .ok_or_else(|| DomainError::not_found("Address not found"))
    }

    /// Look up by street name, house number and city
    pub async fn by_street(
        &self,
        street_name: &str,
        house_number: &str,
        city: &str,
    ) -> Result<Address, DomainError> {
        let query = StreetQuery::new(street_name, house_number, city)?;
        debug!(street = %query.street_name, city = %query.city, "Postal code lookup");

        self.repository
            .find_by_street(&query)
            .await?
            .ok_or_else(|| DomainError::not_found("Address not found"))
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::NewAddress;
    use crate::infrastructure::address::InMemoryAddressRepository;

    async fn create_service() -> AddressLookupService {
        let repo = InMemoryAddressRepository::new();
        repo.insert_many(vec![NewAddress {
            street_name: "Damrak".to_string(),
            house_number: "1".to_string(),
            postal_code: "1012LG".to_string(),
            city: "Amsterdam".to_string(),
            municipality: "Amsterdam".to_string(),
            province: "Noord-Holland".to_string(),
            neighborhood: Some("Centrum".to_string()),
            district: None,
            latitude: 52.3765,
            longitude: 4.8965,
        }])
        .await
        .unwrap();

        AddressLookupService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_lookup_by_postal_code_normalizes_input() {
        let service = create_service().await;

        let address = service.by_postal_code("1012 lg", " 1 ").await.unwrap();
        assert_eq!(address.street_name, "Damrak");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let service = create_service().await;

        let err = service.by_postal_code("1012LG", "99").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.message(), "Address not found");
    }

    #[tokio::test]
    async fn test_lookup_by_street() {
        let service = create_service().await;

        let address = service.by_street("Damrak", "1", "Amsterdam").await.unwrap();
        assert_eq!(address.postal_code, "1012LG");

        let err = service.by_street("Damrak", "1", "Rotterdam").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lookup_validation() {
        let service = create_service().await;

        let err = service.by_street("", "1", "Amsterdam").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
