//! Account endpoints
//!
//! Registration and login are public. Everything else needs an API key or a
//! token issued by `/login`.

pub mod domains;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::quota::next_reset;
use crate::domain::usage::ApiUsage;
use crate::domain::SubscriptionPlan;

const DEFAULT_USAGE_LIMIT: usize = 50;
const MAX_USAGE_LIMIT: usize = 500;

/// Create the account router, mounted at `/api/v1/auth`
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_account))
        .route("/api-key", post(rotate_api_key))
        .route("/usage", get(list_usage))
        .nest("/domains", domains::create_domains_router())
}

/// Credentials payload shared by register and login
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields, or "Wrong payload"
    fn into_parts(self) -> Result<(String, String), ApiError> {
        match (self.email_address, self.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok((email, password))
            }
            _ => Err(ApiError::bad_request("Wrong payload")),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
}

/// Account summary with the current month's usage
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub subscription_plan: SubscriptionPlan,
    pub api_key_prefix: String,
    pub monthly_requests: u32,
    pub monthly_limit: u32,
    pub requests_per_second: u32,
    pub quota_resets_at: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub total: usize,
    pub records: Vec<ApiUsage>,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let (email, password) = request.into_parts()?;

    let registered = state.user_service.register(&email, &password).await?;

    Ok(Json(ApiKeyResponse {
        api_key: registered.api_key,
    }))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = request.into_parts()?;

    let user = state
        .user_service
        .authenticate(&email, &password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let issued = state.jwt_service.generate(&user)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// GET /api/v1/auth/me
pub async fn get_account(RequireAccount(user): RequireAccount) -> Json<AccountResponse> {
    let now = Utc::now();
    let plan = user.subscription_plan();

    Json(AccountResponse {
        id: user.id().to_string(),
        email: user.email().to_string(),
        subscription_plan: plan,
        api_key_prefix: user.api_key_prefix().to_string(),
        monthly_requests: user.quota_state().used_in_month(now),
        monthly_limit: plan.monthly_limit(),
        requests_per_second: plan.requests_per_second(),
        quota_resets_at: next_reset(now).to_rfc3339_opts(SecondsFormat::Millis, true),
        created_at: user.created_at(),
    })
}

/// POST /api/v1/auth/api-key
///
/// Issues a new key. The previous key is rejected from then on.
pub async fn rotate_api_key(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let api_key = state.user_service.rotate_api_key(user.id()).await?;

    Ok(Json(ApiKeyResponse { api_key }))
}

/// GET /api/v1/auth/usage?limit=N
pub async fn list_usage(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_USAGE_LIMIT)
        .clamp(1, MAX_USAGE_LIMIT);

    let records = state.usage_repository.list_recent(user.id(), limit).await?;
    let total = state.usage_repository.count_by_user(user.id()).await?;

    Ok(Json(UsageResponse { total, records }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_request_requires_both_fields() {
        let request: CredentialsRequest =
            serde_json::from_str(r#"{"emailAddress":"dev@example.com","password":"secret123"}"#)
                .unwrap();
        assert_eq!(
            request.into_parts().unwrap(),
            ("dev@example.com".to_string(), "secret123".to_string())
        );

        let request: CredentialsRequest =
            serde_json::from_str(r#"{"emailAddress":"dev@example.com"}"#).unwrap();
        assert_eq!(request.into_parts().unwrap_err().body.error, "Wrong payload");

        let request: CredentialsRequest =
            serde_json::from_str(r#"{"emailAddress":"","password":"secret123"}"#).unwrap();
        assert!(request.into_parts().is_err());
    }
}
