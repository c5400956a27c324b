//! Per-client fixed-window rate limiting.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is allowed; `remaining` requests left in the window.
    Allowed { remaining: u32 },
    /// Request is denied until the window resets.
    Limited { retry_after: Duration },
}

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by client identifier.
///
/// State is local to one process. Entries for lapsed windows are evicted
/// by [`RateLimiter::sweep`], which the server runs on an interval, so
/// the table stays bounded by the set of recently active clients.
pub struct RateLimiter {
    entries: DashMap<String, WindowEntry>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Check and record one request for `client_id`.
    ///
    /// First sight of a client, or a lapsed window, restarts its counter
    /// at 1. Below the cap the counter increments; at the cap the request
    /// is denied with the time until the window resets.
    pub fn check(&self, client_id: &str) -> RateDecision {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert_with(|| WindowEntry {
                count: 0,
                reset_at: now + self.window,
            });

        if now >= entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return RateDecision::Allowed {
                remaining: self.max_requests.saturating_sub(1),
            };
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            RateDecision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        } else {
            RateDecision::Limited {
                retry_after: entry.reset_at.saturating_duration_since(now),
            }
        }
    }

    /// Drop entries whose window has lapsed.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| now < entry.reset_at);
    }

    /// Number of client identifiers currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window_secs,
            sweep_interval_secs: 300,
        })
    }

    #[test]
    fn allows_up_to_cap_then_denies() {
        let limiter = limiter(10, 3600);

        for i in 0..10 {
            match limiter.check("203.0.113.7") {
                RateDecision::Allowed { remaining } => {
                    assert_eq!(remaining, 10 - 1 - i);
                }
                RateDecision::Limited { .. } => panic!("request {} should be allowed", i + 1),
            }
        }

        match limiter.check("203.0.113.7") {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(3600));
                assert!(retry_after > Duration::from_secs(3590));
            }
            RateDecision::Allowed { .. } => panic!("11th request should be denied"),
        }
    }

    #[test]
    fn identities_are_independent() {
        let limiter = limiter(1, 3600);

        assert!(matches!(
            limiter.check("203.0.113.1"),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("203.0.113.2"),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("203.0.113.1"),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn window_lapse_resets_counter() {
        let limiter = RateLimiter {
            entries: DashMap::new(),
            max_requests: 2,
            window: Duration::from_millis(30),
        };

        assert!(matches!(limiter.check("c"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("c"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("c"), RateDecision::Limited { .. }));

        std::thread::sleep(Duration::from_millis(40));
        match limiter.check("c") {
            RateDecision::Allowed { remaining } => assert_eq!(remaining, 1),
            RateDecision::Limited { .. } => panic!("fresh window should allow"),
        }
    }

    #[test]
    fn sweep_evicts_lapsed_entries_only() {
        let limiter = RateLimiter {
            entries: DashMap::new(),
            max_requests: 5,
            window: Duration::from_millis(20),
        };

        limiter.check("stale");
        std::thread::sleep(Duration::from_millis(30));
        limiter.check("fresh");

        assert_eq!(limiter.tracked_clients(), 2);
        limiter.sweep();
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
