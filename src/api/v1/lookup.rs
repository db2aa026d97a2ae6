//! Address lookup endpoints

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::Admitted;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Address, DomainError};
use crate::infrastructure::observability::record_lookup;

/// Body of `POST /api/v1/lookup/address`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressLookupRequest {
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub house_number: String,
}

/// Body of `POST /api/v1/lookup/postal-code`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeLookupRequest {
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub city: String,
}

/// Find an address by postal code and house number
pub async fn lookup_address(
    State(state): State<AppState>,
    Admitted(user): Admitted,
    Json(request): Json<AddressLookupRequest>,
) -> Result<Json<Address>, ApiError> {
    debug!(user_id = %user.id(), "Address lookup");

    let result = state
        .address_service
        .by_postal_code(&request.postal_code, &request.house_number)
        .await;

    observe("postal_code", &result);
    Ok(Json(result?))
}

/// Find an address, and with it the postal code, by street, house number and city
pub async fn lookup_postal_code(
    State(state): State<AppState>,
    Admitted(user): Admitted,
    Json(request): Json<PostalCodeLookupRequest>,
) -> Result<Json<Address>, ApiError> {
    debug!(user_id = %user.id(), "Postal code lookup");

    let result = state
        .address_service
        .by_street(&request.street_name, &request.house_number, &request.city)
        .await;

    observe("street", &result);
    Ok(Json(result?))
}

fn observe(kind: &'static str, result: &Result<Address, DomainError>) {
    match result {
        Ok(_) => record_lookup(kind, true),
        Err(DomainError::NotFound { .. }) => record_lookup(kind, false),
        Err(_) => {}
    }
}
