//! Infrastructure layer - Storage backends, security and observability

pub mod address;
pub mod admission;
pub mod allowed_domain;
pub mod api_key;
pub mod auth;
pub mod logging;
pub mod observability;
pub mod storage;
pub mod usage;
pub mod user;
