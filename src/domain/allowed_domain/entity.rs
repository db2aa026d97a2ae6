//! Allowed domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedDomainId(Uuid);

impl AllowedDomainId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AllowedDomainId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&str> for AllowedDomainId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid domain id", value)))
    }
}

impl std::fmt::Display for AllowedDomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hostname an account accepts browser requests from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedDomain {
    pub id: AllowedDomainId,
    pub user_id: UserId,
    /// Lower-cased hostname
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl AllowedDomain {
    /// `domain` is expected to be normalized already
    pub fn new(user_id: UserId, domain: impl Into<String>) -> Self {
        Self {
            id: AllowedDomainId::new(),
            user_id,
            domain: domain.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether a request host is this domain or one of its subdomains
    pub fn matches(&self, host: &str) -> bool {
        super::matching::host_matches(host, &self.domain)
    }
}
