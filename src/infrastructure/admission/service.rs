//! Lookup admission pipeline
//!
//! Every address lookup runs the same four checks in a fixed order: API key,
//! per-second rate limit, allowed origin, monthly quota. A request that passes
//! all four is logged to the usage table and handed to the lookup handler.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::usage::{ApiUsage, UsageRepository};
use crate::domain::{DomainError, QuotaOutcome, SubscriptionPlan, User};
use crate::infrastructure::allowed_domain::{AllowedDomainService, OriginCheck, OriginRejection};
use crate::infrastructure::api_key::{RateLimitResult, RateLimiter};
use crate::infrastructure::observability::record_admission;
use crate::infrastructure::user::UserService;

/// Reasons a lookup request is turned away
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error(
        "Rate limit exceeded. Your plan ({plan}) allows {} requests per second.",
        rate_limit.limit
    )]
    RateLimited {
        plan: SubscriptionPlan,
        rate_limit: RateLimitResult,
    },

    #[error("{0}")]
    Origin(OriginRejection),

    #[error("Monthly limit exceeded")]
    MonthlyLimitExceeded {
        limit: u32,
        reset_at: DateTime<Utc>,
    },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl AdmissionError {
    /// Label used for the admission metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_key",
            Self::InvalidApiKey => "invalid_key",
            Self::RateLimited { .. } => "rate_limited",
            Self::Origin(_) => "origin_rejected",
            Self::MonthlyLimitExceeded { .. } => "quota_exceeded",
            Self::Storage(_) => "error",
        }
    }
}

/// A request that passed every admission check
#[derive(Debug, Clone)]
pub struct Admission {
    pub user: User,
    pub rate_limit: RateLimitResult,
    /// Requests used this month, including this one
    pub used: u32,
    pub monthly_limit: u32,
}

#[derive(Clone)]
pub struct AdmissionService {
    users: UserService,
    domains: AllowedDomainService,
    usage: Arc<dyn UsageRepository>,
    rate_limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for AdmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionService")
            .field("users", &self.users)
            .field("domains", &self.domains)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

impl AdmissionService {
    pub fn new(
        users: UserService,
        domains: AllowedDomainService,
        usage: Arc<dyn UsageRepository>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            users,
            domains,
            usage,
            rate_limiter,
        }
    }

    /// Run the admission checks for one lookup request
    pub async fn admit(
        &self,
        api_key: Option<&str>,
        origin: Option<&str>,
        endpoint: &str,
    ) -> Result<Admission, AdmissionError> {
        let result = self.run_checks(api_key, origin, endpoint).await;

        match &result {
            Ok(admission) => {
                record_admission("admitted", Some(admission.user.subscription_plan().as_str()))
            }
            Err(e) => record_admission(e.outcome(), None),
        }

        result
    }

    async fn run_checks(
        &self,
        api_key: Option<&str>,
        origin: Option<&str>,
        endpoint: &str,
    ) -> Result<Admission, AdmissionError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AdmissionError::MissingApiKey)?;

        let user = self
            .users
            .find_by_api_key(api_key)
            .await?
            .ok_or(AdmissionError::InvalidApiKey)?;

        let plan = user.subscription_plan();

        let rate_limit = self
            .rate_limiter
            .check_and_record(&user.id().to_string(), plan.requests_per_second())
            .await;

        if !rate_limit.allowed {
            debug!(user_id = %user.id(), plan = %plan, "Rate limit exceeded");
            return Err(AdmissionError::RateLimited { plan, rate_limit });
        }

        if let OriginCheck::Rejected(rejection) =
            self.domains.check_origin(user.id(), origin).await?
        {
            debug!(user_id = %user.id(), reason = %rejection, "Origin rejected");
            return Err(AdmissionError::Origin(rejection));
        }

        let (used, monthly_limit) = match self.users.consume_quota(user.id(), Utc::now()).await? {
            QuotaOutcome::Consumed { used, limit } => (used, limit),
            QuotaOutcome::Exhausted { limit, reset_at } => {
                debug!(user_id = %user.id(), limit, "Monthly limit exceeded");
                return Err(AdmissionError::MonthlyLimitExceeded { limit, reset_at });
            }
        };

        if let Err(e) = self.usage.record(ApiUsage::new(*user.id(), endpoint)).await {
            warn!(user_id = %user.id(), error = %e, "Failed to record API usage");
        }

        Ok(Admission {
            user,
            rate_limit,
            used,
            monthly_limit,
        })
    }
}
