//! API middleware components

pub mod account_auth;
pub mod admission;
pub mod logging;
pub mod metrics;
pub mod security;

use axum::{body::Body, extract::MatchedPath, http::Request};

pub use account_auth::{extract_credentials, Credentials, RequireAccount, API_KEY_HEADER};
pub use admission::{admission_error, admission_middleware, Admitted};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;

/// Route template of a request (`/api/v1/auth/domains/{id}`), falling back to the raw path
pub(crate) fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
