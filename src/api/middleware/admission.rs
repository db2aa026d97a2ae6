//! Admission middleware for the lookup routes

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, OriginalUri, State},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;

use crate::api::state::AppState;
use crate::api::types::{ensure_json_body, ApiError};
use crate::domain::user::User;
use crate::infrastructure::admission::{Admission, AdmissionError};
use crate::infrastructure::allowed_domain::OriginRejection;
use crate::infrastructure::api_key::RateLimitResult;

use super::account_auth::API_KEY_HEADER;
use super::security::MAX_BODY_SIZE;

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Run the admission checks before a lookup handler.
///
/// The body is buffered and must be a JSON document first, so unparseable
/// requests are rejected without touching the rate limit, quota or usage log.
/// Admitted requests carry the account in their extensions and get the
/// `x-ratelimit-*` headers on the way out.
pub async fn admission_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_SIZE).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
                .into_response();
        }
    };

    if let Err(e) = ensure_json_body(&parts.headers, bytes.clone()).await {
        return e.into_response();
    }

    let api_key = header_str(&parts.headers, API_KEY_HEADER);
    let origin = header_str(&parts.headers, header::ORIGIN.as_str());
    let endpoint = full_path(&parts);
    let mut request = Request::from_parts(parts, Body::from(bytes));

    let admission = match state
        .admission_service
        .admit(api_key.as_deref(), origin.as_deref(), &endpoint)
        .await
    {
        Ok(admission) => admission,
        Err(e) => return admission_error(e).into_response(),
    };

    let rate_limit = admission.rate_limit.clone();
    request.extensions_mut().insert(admission);

    let mut response = next.run(request).await;
    insert_rate_limit_headers(response.headers_mut(), &rate_limit);

    response
}

/// The account admitted by [`admission_middleware`]
#[derive(Debug, Clone)]
pub struct Admitted(pub User);

impl<S: Send + Sync> FromRequestParts<S> for Admitted {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Admission>()
            .map(|admission| Admitted(admission.user.clone()))
            .ok_or_else(|| ApiError::internal("Internal server error"))
    }
}

/// Request path before nested routers stripped their prefixes
fn full_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string())
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, rate_limit: &RateLimitResult) {
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(rate_limit.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(rate_limit.remaining));
    headers.insert(RATE_LIMIT_RESET, HeaderValue::from(rate_limit.reset_in_seconds));
}

/// Map an admission failure to its HTTP response
pub fn admission_error(err: AdmissionError) -> ApiError {
    let message = err.to_string();

    match err {
        AdmissionError::MissingApiKey | AdmissionError::InvalidApiKey => {
            ApiError::unauthorized(message)
        }
        AdmissionError::RateLimited { rate_limit, .. } => {
            let mut error = ApiError::too_many_requests("Too Many Requests")
                .with_message(message)
                .with_detail("statusCode", 429)
                .with_detail("limit", rate_limit.limit)
                .with_detail("remaining", rate_limit.remaining)
                .with_detail("reset", rate_limit.reset_in_seconds)
                .with_header(header::RETRY_AFTER, HeaderValue::from(rate_limit.reset_in_seconds));

            insert_rate_limit_headers(&mut error.headers, &rate_limit);
            error
        }
        AdmissionError::Origin(OriginRejection::NotAllowed { .. }) => {
            ApiError::forbidden("Domain not allowed")
                .with_message("This domain is not authorized to make API requests")
        }
        AdmissionError::Origin(rejection) => ApiError::bad_request(rejection.to_string()),
        AdmissionError::MonthlyLimitExceeded { limit, reset_at } => {
            ApiError::too_many_requests(message)
                .with_detail("limit", limit)
                .with_detail("reset", reset_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        AdmissionError::Storage(e) => e.into(),
    }
}
