//! Usage logging infrastructure

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryUsageRepository;
pub use postgres_repository::PostgresUsageRepository;
