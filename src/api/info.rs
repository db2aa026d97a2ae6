//! Service description served at `/`

use axum::response::IntoResponse;
use serde::Serialize;

use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub auth: &'static str,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("POST", "/api/v1/auth/register", "none"),
    ("POST", "/api/v1/auth/login", "none"),
    ("GET", "/api/v1/auth/me", "api key or bearer token"),
    ("POST", "/api/v1/auth/api-key", "api key or bearer token"),
    ("GET", "/api/v1/auth/usage", "api key or bearer token"),
    ("GET", "/api/v1/auth/domains", "api key or bearer token"),
    ("POST", "/api/v1/auth/domains", "api key or bearer token"),
    ("DELETE", "/api/v1/auth/domains/{id}", "api key or bearer token"),
    ("POST", "/api/v1/lookup/address", "api key"),
    ("POST", "/api/v1/lookup/postal-code", "api key"),
    ("GET", "/health", "none"),
    ("GET", "/ready", "none"),
    ("GET", "/live", "none"),
];

pub async fn service_info() -> impl IntoResponse {
    Json(ServiceInfo {
        name: "NL Address API",
        version: env!("CARGO_PKG_VERSION"),
        description: "Dutch address lookup by postal code or street",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, auth)| EndpointInfo { method, path, auth })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_routes_listed() {
        let paths: Vec<&str> = ENDPOINTS.iter().map(|(_, path, _)| *path).collect();

        assert!(paths.contains(&"/api/v1/lookup/address"));
        assert!(paths.contains(&"/api/v1/lookup/postal-code"));
    }
}
