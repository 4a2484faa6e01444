use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::registry::ApiKeyRecord;

pub const WINDOW_SECS: i64 = 3600;

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Minutes left in the current window when denied, otherwise 0.
    pub retry_after_minutes: u64,
    /// Seconds left in the current window when denied, otherwise 0.
    pub retry_after_seconds: u64,
    pub window_resets_at: DateTime<Utc>,
}

/// Fixed one-hour window per key, reset lazily on the first request seen
/// after the window has expired.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            window: Duration::seconds(WINDOW_SECS),
        }
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Resets an expired window, decides, and reserves a slot when allowed.
    /// All three happen on the same `&mut` borrow so callers holding the
    /// registry lock get an atomic check-and-increment.
    pub fn check(&self, record: &mut ApiKeyRecord, now: DateTime<Utc>) -> RateDecision {
        if now - record.window_start > self.window {
            record.requests_this_hour = 0;
            record.window_start = now;
        }

        let window_resets_at = record.window_start + self.window;
        let allowed = record.requests_this_hour < record.rate_limit_per_hour;

        if allowed {
            record.requests_this_hour += 1;
            return RateDecision {
                allowed,
                limit: record.rate_limit_per_hour,
                remaining: record.rate_limit_per_hour - record.requests_this_hour,
                retry_after_minutes: 0,
                retry_after_seconds: 0,
                window_resets_at,
            };
        }

        let left = (window_resets_at - now).num_seconds().max(1) as u64;
        RateDecision {
            allowed,
            limit: record.rate_limit_per_hour,
            remaining: 0,
            retry_after_minutes: left.div_ceil(60),
            retry_after_seconds: left,
            window_resets_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(limit: u32, window_start: DateTime<Utc>) -> ApiKeyRecord {
        ApiKeyRecord {
            key: "nt_test".to_string(),
            name: "test".to_string(),
            created_at: window_start,
            rate_limit_per_hour: limit,
            requests_this_hour: 0,
            window_start,
            is_dev: false,
        }
    }

    #[test]
    fn test_n_plus_one_requests() {
        let limiter = RateLimiter::new();
        let start = Utc::now();
        let mut rec = record(3, start);

        for i in 0..3 {
            let decision = limiter.check(&mut rec, start + Duration::seconds(i));
            assert!(decision.allowed);
            assert_eq!(decision.retry_after_minutes, 0);
        }
        let denied = limiter.check(&mut rec, start + Duration::seconds(10));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert!(denied.retry_after_minutes > 0);
        assert_eq!(denied.retry_after_seconds, 3590);
        assert_eq!(denied.retry_after_minutes, 60);
        assert_eq!(rec.requests_this_hour, 3);
    }

    #[test]
    fn test_window_resets_to_one_after_admission() {
        let limiter = RateLimiter::new();
        let start = Utc::now() - Duration::seconds(WINDOW_SECS + 1);
        let mut rec = record(5, start);
        rec.requests_this_hour = 5;

        let now = Utc::now();
        let decision = limiter.check(&mut rec, now);
        assert!(decision.allowed);
        assert_eq!(rec.requests_this_hour, 1);
        assert_eq!(rec.window_start, now);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let limiter = RateLimiter::new();
        let start = Utc::now();
        let mut rec = record(1, start);
        rec.requests_this_hour = 1;

        // Exactly one hour later the window has not yet expired.
        let decision = limiter.check(&mut rec, start + Duration::seconds(WINDOW_SECS));
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after_minutes, 1);
        assert_eq!(rec.window_start, start);
    }

    #[test]
    fn test_retry_after_rounds_up_to_minutes() {
        let limiter = RateLimiter::new();
        let start = Utc::now();
        let mut rec = record(1, start);
        rec.requests_this_hour = 1;

        let decision = limiter.check(&mut rec, start + Duration::seconds(WINDOW_SECS - 61));
        assert_eq!(decision.retry_after_seconds, 61);
        assert_eq!(decision.retry_after_minutes, 2);
    }
}
