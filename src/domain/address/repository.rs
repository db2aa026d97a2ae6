//! Address repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Address, NewAddress, PostalCodeQuery, StreetQuery};
use crate::domain::DomainError;

/// Read-mostly store of addresses, looked up by indexed columns
#[async_trait]
pub trait AddressRepository: Send + Sync + Debug {
    /// First address with this postal code and house number
    async fn find_by_postal_code(
        &self,
        query: &PostalCodeQuery,
    ) -> Result<Option<Address>, DomainError>;

    /// First address with this street, house number and city
    async fn find_by_street(&self, query: &StreetQuery) -> Result<Option<Address>, DomainError>;

    /// Insert a batch of addresses, returning how many were stored
    async fn insert_many(&self, addresses: Vec<NewAddress>) -> Result<usize, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
