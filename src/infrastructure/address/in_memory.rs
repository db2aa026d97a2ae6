//! In-memory address repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::address::{
    Address, AddressRepository, NewAddress, PostalCodeQuery, StreetQuery,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct AddressTable {
    rows: Vec<Address>,
    /// (postal code, house number) -> row positions, in insertion order
    postal_index: HashMap<(String, String), Vec<usize>>,
    next_id: i64,
}

/// Address store backed by a vector plus a postal code index
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressRepository {
    table: Arc<RwLock<AddressTable>>,
}

impl InMemoryAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn find_by_postal_code(
        &self,
        query: &PostalCodeQuery,
    ) -> Result<Option<Address>, DomainError> {
        let table = self.table.read().await;
        let key = (query.postal_code.clone(), query.house_number.clone());

        Ok(table
            .postal_index
            .get(&key)
            .and_then(|positions| positions.first())
            .and_then(|&pos| table.rows.get(pos))
            .cloned())
    }

    async fn find_by_street(&self, query: &StreetQuery) -> Result<Option<Address>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .iter()
            .find(|a| {
                a.street_name == query.street_name
                    && a.house_number == query.house_number
                    && a.city == query.city
            })
            .cloned())
    }

    async fn insert_many(&self, addresses: Vec<NewAddress>) -> Result<usize, DomainError> {
        let mut table = self.table.write().await;
        let inserted = addresses.len();
        let now = Utc::now();

        for new_address in addresses {
            table.next_id += 1;
            let address = new_address.into_address(table.next_id, now);
            let key = (address.postal_code.clone(), address.house_number.clone());
            let position = table.rows.len();

            table.rows.push(address);
            table.postal_index.entry(key).or_default().push(position);
        }

        Ok(inserted)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_address(street: &str, number: &str, postal_code: &str, city: &str) -> NewAddress {
        NewAddress {
            street_name: street.to_string(),
            house_number: number.to_string(),
            postal_code: postal_code.to_string(),
            city: city.to_string(),
            municipality: city.to_string(),
            province: "Utrecht".to_string(),
            neighborhood: None,
            district: None,
            latitude: 52.09,
            longitude: 5.12,
        }
    }

    #[tokio::test]
    async fn test_find_by_postal_code() {
        let repo = InMemoryAddressRepository::new();
        repo.insert_many(vec![
            new_address("Kerkstraat", "1", "3511AB", "Utrecht"),
            new_address("Kerkstraat", "2", "3511AB", "Utrecht"),
        ])
        .await
        .unwrap();

        let query = PostalCodeQuery::new("3511 ab", "2").unwrap();
        let found = repo.find_by_postal_code(&query).await.unwrap().unwrap();
        assert_eq!(found.house_number, "2");
        assert_eq!(found.id, 2);

        let query = PostalCodeQuery::new("3511AB", "3").unwrap();
        assert!(repo.find_by_postal_code(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_returns_first_match() {
        let repo = InMemoryAddressRepository::new();
        repo.insert_many(vec![
            new_address("Kerkstraat", "1", "3511AB", "Utrecht"),
            new_address("Molenweg", "1", "3511AB", "Utrecht"),
        ])
        .await
        .unwrap();

        let query = PostalCodeQuery::new("3511AB", "1").unwrap();
        let found = repo.find_by_postal_code(&query).await.unwrap().unwrap();
        assert_eq!(found.street_name, "Kerkstraat");
    }

    #[tokio::test]
    async fn test_find_by_street() {
        let repo = InMemoryAddressRepository::new();
        repo.insert_many(vec![
            new_address("Kerkstraat", "1", "3511AB", "Utrecht"),
            new_address("Kerkstraat", "1", "1011CD", "Amsterdam"),
        ])
        .await
        .unwrap();

        let query = StreetQuery::new("Kerkstraat", "1", "Amsterdam").unwrap();
        let found = repo.find_by_street(&query).await.unwrap().unwrap();
        assert_eq!(found.postal_code, "1011CD");

        let query = StreetQuery::new("Kerkstraat", "1", "Breda").unwrap();
        assert!(repo.find_by_street(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = InMemoryAddressRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);

        let inserted = repo
            .insert_many(vec![new_address("Parkweg", "9", "9711AA", "Groningen")])
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
