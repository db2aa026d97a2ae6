//! Authentication infrastructure module
//!
//! JWT issuance and validation for account-management endpoints.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService};
