//! Monthly request quota bookkeeping
//!
//! Quotas are counted per UTC calendar month. The counter is lazily reset on
//! the first request of a new month rather than by a scheduled job.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// Returns true when `last_reset` lies in an earlier (or later) calendar month than `now`
pub fn needs_reset(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_reset.year() != now.year() || last_reset.month() != now.month()
}

/// First instant of the calendar month following `now`
pub fn next_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// Outcome of trying to consume one request from a monthly quota
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuotaOutcome {
    /// The request was counted
    Consumed { used: u32, limit: u32 },
    /// The quota for this month is spent
    Exhausted {
        limit: u32,
        reset_at: DateTime<Utc>,
    },
}

impl QuotaOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed { .. })
    }
}

/// Counter state persisted alongside an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub used: u32,
    pub last_reset: DateTime<Utc>,
}

impl QuotaState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            used: 0,
            last_reset: now,
        }
    }

    /// Requests counted so far in the month containing `now`
    pub fn used_in_month(&self, now: DateTime<Utc>) -> u32 {
        if needs_reset(self.last_reset, now) {
            0
        } else {
            self.used
        }
    }

    /// Reset on month rollover, then count the request if it fits under `limit`
    pub fn consume(&mut self, limit: u32, now: DateTime<Utc>) -> QuotaOutcome {
        if needs_reset(self.last_reset, now) {
            self.used = 0;
            self.last_reset = now;
        }

        if self.used >= limit {
            return QuotaOutcome::Exhausted {
                limit,
                reset_at: next_reset(now),
            };
        }

        self.used += 1;

        QuotaOutcome::Consumed {
            used: self.used,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_needs_reset_same_month() {
        assert!(!needs_reset(at(2024, 3, 1), at(2024, 3, 31)));
    }

    #[test]
    fn test_needs_reset_new_month() {
        assert!(needs_reset(at(2024, 3, 31), at(2024, 4, 1)));
    }

    #[test]
    fn test_needs_reset_same_month_different_year() {
        assert!(needs_reset(at(2023, 3, 15), at(2024, 3, 15)));
    }

    #[test]
    fn test_needs_reset_when_clock_moved_back() {
        assert!(needs_reset(at(2024, 5, 2), at(2024, 4, 30)));
    }

    #[test]
    fn test_next_reset() {
        assert_eq!(
            next_reset(at(2024, 3, 15)),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_reset_december() {
        assert_eq!(
            next_reset(at(2024, 12, 31)),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_consume_until_exhausted() {
        let now = at(2024, 5, 10);
        let mut state = QuotaState::new(now);

        assert_eq!(state.consume(2, now), QuotaOutcome::Consumed { used: 1, limit: 2 });
        assert_eq!(state.consume(2, now), QuotaOutcome::Consumed { used: 2, limit: 2 });

        let outcome = state.consume(2, now);
        assert_eq!(
            outcome,
            QuotaOutcome::Exhausted {
                limit: 2,
                reset_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            }
        );
        assert_eq!(state.used, 2);
    }

    #[test]
    fn test_consume_resets_on_new_month() {
        let mut state = QuotaState {
            used: 1_000,
            last_reset: at(2024, 1, 20),
        };

        let now = at(2024, 2, 1);
        let outcome = state.consume(1_000, now);

        assert!(outcome.is_consumed());
        assert_eq!(state.used, 1);
        assert_eq!(state.last_reset, now);
    }

    #[test]
    fn test_used_in_month() {
        let state = QuotaState {
            used: 42,
            last_reset: at(2024, 1, 20),
        };

        assert_eq!(state.used_in_month(at(2024, 1, 25)), 42);
        assert_eq!(state.used_in_month(at(2024, 2, 1)), 0);
    }
}
