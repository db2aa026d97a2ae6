//! Usage logging domain
//!
//! Every admitted lookup leaves one [`ApiUsage`] record behind.

mod record;
mod repository;

pub use record::{ApiUsage, UsageRecordId};
pub use repository::UsageRepository;

#[cfg(test)]
pub use repository::MockUsageRepository;
