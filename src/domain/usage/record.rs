//! Usage record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Unique identifier for a usage record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageRecordId(Uuid);

impl UsageRecordId {
    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UsageRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One admitted lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsage {
    pub id: UsageRecordId,
    pub user_id: UserId,
    /// Request path of the lookup, e.g. `/api/v1/lookup/address`
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiUsage {
    pub fn new(user_id: UserId, endpoint: impl Into<String>) -> Self {
        Self {
            id: UsageRecordId::generate(),
            user_id,
            endpoint: endpoint.into(),
            timestamp: Utc::now(),
        }
    }
}
