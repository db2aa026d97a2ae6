//! Account authentication for the account-management endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires an authenticated account
///
/// Accepts either of:
/// - `X-API-Key: <api_key>`
/// - `Authorization: Bearer <jwt_token>`
///
/// Unlike lookups, account requests do not count against the monthly quota
/// and skip the per-second rate limit. A key that has used up its month can
/// still list, add and remove allowed domains, where a metered key check
/// would answer 429.
#[derive(Debug, Clone)]
pub struct RequireAccount(pub User);

/// Credentials presented on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Bearer(String),
}

impl FromRequestParts<AppState> for RequireAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match extract_credentials(&parts.headers)? {
            Credentials::ApiKey(key) => {
                let user = state
                    .user_service
                    .find_by_api_key(&key)
                    .await?
                    .ok_or_else(|| ApiError::unauthorized("Invalid API key"))?;

                debug!(
                    user_id = %user.id(),
                    key_prefix = %user.api_key_prefix(),
                    "Authenticated account by API key"
                );
                user
            }
            Credentials::Bearer(token) => {
                let claims = state
                    .jwt_service
                    .validate(&token)
                    .map_err(|_| ApiError::unauthorized("Invalid token"))?;

                let user_id = claims
                    .user_id()
                    .map_err(|_| ApiError::unauthorized("Invalid token"))?;

                state
                    .user_service
                    .get(&user_id)
                    .await?
                    .ok_or_else(|| ApiError::unauthorized("Invalid token"))?
            }
        };

        Ok(RequireAccount(user))
    }
}

/// Read the API key or bearer token from the request headers. The API key wins when both are present.
pub fn extract_credentials(headers: &HeaderMap) -> Result<Credentials, ApiError> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        let key = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?
            .trim();

        if !key.is_empty() {
            return Ok(Credentials::ApiKey(key.to_string()));
        }
    }

    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let auth = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(Credentials::Bearer(token.to_string()));
            }
        }
    }

    Err(ApiError::unauthorized("Authentication required").with_message(
        "Provide an API key via 'X-API-Key' or a token via 'Authorization: Bearer <token>'",
    ))
}
