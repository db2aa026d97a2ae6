//! Allowed domain management

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::AllowedDomain;

/// Mounted at `/api/v1/auth/domains`
pub fn create_domains_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_domains).post(add_domain))
        .route("/{id}", delete(remove_domain))
}

#[derive(Debug, Deserialize)]
pub struct AddDomainRequest {
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/v1/auth/domains, newest first
pub async fn list_domains(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
) -> Result<Json<Vec<AllowedDomain>>, ApiError> {
    Ok(Json(state.domain_service.list(user.id()).await?))
}

/// POST /api/v1/auth/domains
pub async fn add_domain(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    Json(request): Json<AddDomainRequest>,
) -> Result<Json<AllowedDomain>, ApiError> {
    let domain = request.domain.unwrap_or_default();

    Ok(Json(state.domain_service.add(user.id(), &domain).await?))
}

/// DELETE /api/v1/auth/domains/{id}
pub async fn remove_domain(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.domain_service.remove(user.id(), &id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
