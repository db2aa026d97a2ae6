//! Address storage, lookup and sample data

mod in_memory;
mod postgres_repository;
mod seed;
mod service;

pub use in_memory::InMemoryAddressRepository;
pub use postgres_repository::PostgresAddressRepository;
pub use seed::{seed_addresses, AddressGenerator, SEED_BATCH_SIZE};
pub use service::AddressLookupService;
