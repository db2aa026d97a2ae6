//! Rate limiter implementation
//!
//! Sliding window rate limiting, keyed by account. The window is one second
//! and the limit comes from the account's subscription plan.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until a slot frees up (in whole seconds, rounded up)
    pub reset_in_seconds: u64,
}

/// Sliding window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Per-key request timestamps, oldest first
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    window: Duration,
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    /// Create a rate limiter with a one second window
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            window,
            cleanup_interval: Duration::from_secs(60),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Check and record in one operation
    pub async fn check_and_record(&self, key: &str, limit: u32) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;

        let key_records = records.entry(key.to_string()).or_default();
        let window_start = now.checked_sub(self.window).unwrap_or(now);
        key_records.retain(|t| *t > window_start);

        let result = self.calculate(Some(key_records), limit, now);

        if result.allowed {
            key_records.push(now);
        }

        result
    }

    fn calculate(&self, records: Option<&Vec<Instant>>, limit: u32, now: Instant) -> RateLimitResult {
        let window_start = now.checked_sub(self.window).unwrap_or(now);

        let in_window: Vec<Instant> = records
            .map(|r| r.iter().copied().filter(|t| *t > window_start).collect())
            .unwrap_or_default();
        let count = in_window.len() as u32;

        if count >= limit {
            let reset_in = in_window
                .iter()
                .min()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit,
                reset_in_seconds: ceil_seconds(reset_in),
            };
        }

        RateLimitResult {
            allowed: true,
            remaining: limit.saturating_sub(count + 1),
            limit,
            reset_in_seconds: ceil_seconds(self.window),
        }
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = Instant::now();

            let now = Instant::now();
            let cutoff = now.checked_sub(self.window).unwrap_or(now);

            let mut records = self.records.write().await;

            for key_records in records.values_mut() {
                key_records.retain(|t| *t > cutoff);
            }

            records.retain(|_, v| !v.is_empty());
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn ceil_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}
