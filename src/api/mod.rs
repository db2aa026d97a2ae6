//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod info;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use middleware::{Admitted, RequireAccount};
pub use router::{create_router, create_router_with_metrics};
pub use state::AppState;
