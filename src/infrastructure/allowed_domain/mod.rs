//! Allowed domain storage and origin checks

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryAllowedDomainRepository;
pub use postgres_repository::PostgresAllowedDomainRepository;
pub use service::{AllowedDomainService, OriginCheck, OriginRejection};
