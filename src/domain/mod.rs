//! Domain layer - Core business logic and entities

pub mod address;
pub mod allowed_domain;
pub mod error;
pub mod plan;
pub mod quota;
pub mod usage;
pub mod user;

pub use address::{Address, AddressRepository, NewAddress, PostalCodeQuery, StreetQuery};
pub use allowed_domain::{AllowedDomain, AllowedDomainId, AllowedDomainRepository};
pub use error::DomainError;
pub use plan::SubscriptionPlan;
pub use quota::QuotaOutcome;
pub use usage::{ApiUsage, UsageRepository};
pub use user::{User, UserId, UserRepository};
