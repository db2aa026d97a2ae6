//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorBody};
pub use json::{ensure_json_body, Json};
