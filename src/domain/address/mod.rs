//! Address domain

mod entity;
mod repository;

pub use entity::{normalize_postal_code, Address, NewAddress, PostalCodeQuery, StreetQuery};
pub use repository::AddressRepository;
