//! User domain
//!
//! Accounts own an API key, a subscription plan and a monthly request counter.

mod entity;
mod repository;
mod validation;

pub use entity::{normalize_email, User, UserId, UserSnapshot};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_password, UserValidationError};
