//! Subscription plans and their admission limits

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription tier of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    #[default]
    Hobby,
    Pro,
    Enterprise,
}

impl SubscriptionPlan {
    /// Number of admitted lookups per calendar month
    pub fn monthly_limit(&self) -> u32 {
        match self {
            Self::Hobby => 1_000,
            Self::Pro => 10_000,
            Self::Enterprise => 100_000,
        }
    }

    /// Number of admitted lookups per second
    pub fn requests_per_second(&self) -> u32 {
        match self {
            Self::Hobby => 5,
            Self::Pro => 10,
            Self::Enterprise => 25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hobby => "HOBBY",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HOBBY" => Ok(Self::Hobby),
            "PRO" => Ok(Self::Pro),
            "ENTERPRISE" => Ok(Self::Enterprise),
            other => Err(format!("Unknown subscription plan: {}", other)),
        }
    }
}
