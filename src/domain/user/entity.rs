//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::plan::SubscriptionPlan;
use crate::domain::quota::{QuotaOutcome, QuotaState};
use crate::domain::DomainError;

/// Account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&str> for UserId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user id", value)))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored state of an account, used to rebuild a [`User`] from persistence
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub api_key_hash: String,
    pub api_key_prefix: String,
    pub subscription_plan: SubscriptionPlan,
    pub monthly_requests: u32,
    pub last_request_reset: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registered API account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    /// Lower-cased login email
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Hash of the active API key - the plaintext key is never stored
    #[serde(skip_serializing)]
    api_key_hash: String,
    /// Leading characters of the active API key, for display
    api_key_prefix: String,
    subscription_plan: SubscriptionPlan,
    monthly_requests: u32,
    last_request_reset: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account on the default plan
    pub fn new(
        email: impl AsRef<str>,
        password_hash: impl Into<String>,
        api_key_hash: impl Into<String>,
        api_key_prefix: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
            api_key_hash: api_key_hash.into(),
            api_key_prefix: api_key_prefix.into(),
            subscription_plan: SubscriptionPlan::default(),
            monthly_requests: 0,
            last_request_reset: now,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn api_key_hash(&self) -> &str {
        &self.api_key_hash
    }

    pub fn api_key_prefix(&self) -> &str {
        &self.api_key_prefix
    }

    pub fn subscription_plan(&self) -> SubscriptionPlan {
        self.subscription_plan
    }

    pub fn monthly_requests(&self) -> u32 {
        self.monthly_requests
    }

    pub fn last_request_reset(&self) -> DateTime<Utc> {
        self.last_request_reset
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn quota_state(&self) -> QuotaState {
        QuotaState {
            used: self.monthly_requests,
            last_reset: self.last_request_reset,
        }
    }

    // Mutators

    /// Replace the active API key
    pub fn set_api_key(&mut self, hash: impl Into<String>, prefix: impl Into<String>) {
        self.api_key_hash = hash.into();
        self.api_key_prefix = prefix.into();
        self.touch();
    }

    /// Overwrite the monthly counter
    pub fn set_monthly_usage(&mut self, count: u32, last_reset: DateTime<Utc>) {
        self.monthly_requests = count;
        self.last_request_reset = last_reset;
        self.touch();
    }

    /// Count one request against the plan's monthly limit
    pub fn consume_request(&mut self, now: DateTime<Utc>) -> QuotaOutcome {
        let mut state = self.quota_state();
        let outcome = state.consume(self.subscription_plan.monthly_limit(), now);

        self.monthly_requests = state.used;
        self.last_request_reset = state.last_reset;
        if outcome.is_consumed() {
            self.updated_at = now;
        }

        outcome
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<UserSnapshot> for User {
    fn from(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            email: snapshot.email,
            password_hash: snapshot.password_hash,
            api_key_hash: snapshot.api_key_hash,
            api_key_prefix: snapshot.api_key_prefix,
            subscription_plan: snapshot.subscription_plan,
            monthly_requests: snapshot.monthly_requests,
            last_request_reset: snapshot.last_request_reset,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn create_test_user() -> User {
        User::new("Dev@Example.com", "hashed_password", "sha256$abc", "nla_live_abcd")
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::new();
        let parsed = UserId::try_from(id.to_string().as_str()).unwrap();
        assert_eq!(id, parsed);

        assert!(UserId::try_from("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user();

        assert_eq!(user.email(), "dev@example.com");
        assert_eq!(user.password_hash(), "hashed_password");
        assert_eq!(user.api_key_prefix(), "nla_live_abcd");
        assert_eq!(user.subscription_plan(), SubscriptionPlan::Hobby);
        assert_eq!(user.monthly_requests(), 0);
    }

    #[test]
    fn test_user_serialization_excludes_secrets() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("sha256$abc"));
        assert!(json.contains("subscriptionPlan"));
        assert!(json.contains("HOBBY"));
    }

    #[test]
    fn test_set_api_key() {
        let mut user = create_test_user();
        user.set_api_key("sha256$new", "nla_live_wxyz");

        assert_eq!(user.api_key_hash(), "sha256$new");
        assert_eq!(user.api_key_prefix(), "nla_live_wxyz");
    }

    #[test]
    fn test_consume_request_counts() {
        let mut user = create_test_user();
        let now = Utc::now();

        let outcome = user.consume_request(now);
        assert_eq!(outcome, QuotaOutcome::Consumed { used: 1, limit: 1_000 });
        assert_eq!(user.monthly_requests(), 1);
    }

    #[test]
    fn test_consume_request_exhausted() {
        let mut user = create_test_user();
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 8, 0, 0).unwrap();
        user.set_monthly_usage(1_000, now - Duration::days(1));

        let outcome = user.consume_request(now);
        assert!(matches!(outcome, QuotaOutcome::Exhausted { limit: 1_000, .. }));
        assert_eq!(user.monthly_requests(), 1_000);
    }

    #[test]
    fn test_consume_request_after_month_rollover() {
        let mut user = create_test_user();
        let last_month = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 0).unwrap();
        user.set_monthly_usage(1_000, last_month);

        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 1).unwrap();
        let outcome = user.consume_request(now);

        assert!(outcome.is_consumed());
        assert_eq!(user.monthly_requests(), 1);
        assert_eq!(user.last_request_reset(), now);
    }

    #[test]
    fn test_pro_plan_has_higher_limit() {
        let now = Utc::now();
        let mut user = User::from(UserSnapshot {
            id: UserId::new(),
            email: "pro@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            api_key_hash: "sha256$pro".to_string(),
            api_key_prefix: "nla_live_pro".to_string(),
            subscription_plan: SubscriptionPlan::Pro,
            monthly_requests: 1_000,
            last_request_reset: now,
            created_at: now,
            updated_at: now,
        });

        assert_eq!(
            user.consume_request(now),
            QuotaOutcome::Consumed { used: 1_001, limit: 10_000 }
        );
    }
}
