//! API key infrastructure
//!
//! Key generation and hashing, plus the per-second rate limiter applied to
//! authenticated keys.

mod generator;
mod rate_limiter;

pub use generator::{hash_key, ApiKeyGenerator, GeneratedApiKey, DEFAULT_KEY_PREFIX};
pub use rate_limiter::{RateLimitResult, RateLimiter};
