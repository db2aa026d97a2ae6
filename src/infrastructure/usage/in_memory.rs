//! In-memory usage repository

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::usage::{ApiUsage, UsageRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory usage log, bounded to the newest `max_records` entries
#[derive(Debug, Clone)]
pub struct InMemoryUsageRepository {
    records: Arc<RwLock<VecDeque<ApiUsage>>>,
    max_records: usize,
}

impl InMemoryUsageRepository {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(VecDeque::new())),
            max_records,
        }
    }
}

impl Default for InMemoryUsageRepository {
    fn default() -> Self {
        Self::new(100_000)
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn record(&self, usage: ApiUsage) -> Result<(), DomainError> {
        let mut records = self.records.write().await;

        records.push_back(usage);
        while records.len() > self.max_records {
            records.pop_front();
        }

        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ApiUsage>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == *user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.user_id == *user_id).count())
    }
}
