//! Probe endpoints: `/health`, `/ready` and `/live`

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::DomainError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<ComponentCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Storage answers but lookups cannot succeed, e.g. no addresses loaded
    Degraded,
    Unhealthy,
}

/// One storage component and the number of rows it holds
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl ComponentCheck {
    fn from_count(name: &'static str, count: Result<usize, DomainError>, started: Instant) -> Self {
        let latency_ms = started.elapsed().as_millis() as u64;

        match count {
            Ok(rows) => Self {
                name,
                status: HealthStatus::Healthy,
                rows: Some(rows),
                message: None,
                latency_ms,
            },
            Err(e) => Self {
                name,
                status: HealthStatus::Unhealthy,
                rows: None,
                message: Some(e.to_string()),
                latency_ms,
            },
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
        latency_ms: None,
    })
}

/// GET /ready
///
/// Counts accounts and addresses. A failing store answers 503. An empty
/// address table still answers 200 but reports `degraded`.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let started = Instant::now();
    let accounts = ComponentCheck::from_count(
        "accounts",
        state.user_service.count().await,
        started,
    );

    let started = Instant::now();
    let mut addresses = ComponentCheck::from_count(
        "addresses",
        state.address_service.count().await,
        started,
    );
    if addresses.rows == Some(0) {
        addresses.status = HealthStatus::Degraded;
        addresses.message = Some("No addresses loaded".to_string());
    }

    let checks = vec![accounts, addresses];
    let status = overall_status(&checks);

    let code = if status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: Some(checks),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        }),
    )
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

/// Worst status among the components
fn overall_status(checks: &[ComponentCheck]) -> HealthStatus {
    checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy)
}
