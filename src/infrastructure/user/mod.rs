//! User infrastructure module
//!
//! Argon2 password hashing, in-memory and PostgreSQL account repositories,
//! and the account service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub(crate) use postgres_repository::is_unique_violation;
pub use repository::InMemoryUserRepository;
pub use service::{RegisteredUser, UserService};
