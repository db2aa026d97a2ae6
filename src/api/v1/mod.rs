//! Versioned API, mounted at `/api/v1`

pub mod lookup;

use axum::{middleware, routing::post, Router};

use super::auth;
use super::middleware::admission_middleware;
use super::state::AppState;

/// Create v1 API router. Lookups run behind the admission middleware.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    let lookups = Router::new()
        .route("/address", post(lookup::lookup_address))
        .route("/postal-code", post(lookup::lookup_postal_code))
        .route_layer(middleware::from_fn_with_state(state, admission_middleware));

    Router::new()
        .nest("/auth", auth::create_auth_router())
        .nest("/lookup", lookups)
}
