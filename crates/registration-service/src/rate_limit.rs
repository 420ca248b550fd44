//! Per-client fixed-window rate limiting.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Map size below which expired windows are left in place.
const PRUNE_THRESHOLD: usize = 1024;

/// Request count for one client within its current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: Instant,
}

impl Window {
    fn start(now: Instant) -> Self {
        Self {
            count: 1,
            started_at: now,
        }
    }
}

/// Rate limiter keyed by client address.
///
/// Each client gets `max_requests` requests per window. The window opens on
/// the first request and expires lazily: the next request after expiry opens
/// a fresh window with a count of one. There is no background sweep: once the
/// map holds more than [`PRUNE_THRESHOLD`] clients, a request from a new
/// client drops every expired window, at most once per window length.
///
/// Every check runs its read-modify-write while holding the key's shard
/// lock, so concurrent requests from one client are all counted.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
    last_pruned: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window` per client.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            last_pruned: Mutex::new(Instant::now()),
        }
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(u32::MAX, Duration::from_secs(60))
    }

    /// Record a request from `client`, returning whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        // Must run before the entry below is taken: retain locks every shard.
        if !self.windows.contains_key(client) {
            self.prune_expired(now);
        }

        match self.windows.entry(client.to_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(Window::start(now));
                true
            }
            Entry::Occupied(mut entry) => {
                let window = entry.get_mut();
                if now.saturating_duration_since(window.started_at) >= self.window {
                    debug!(client, "Rate limit window reset");
                    *window = Window::start(now);
                    true
                } else if window.count < self.max_requests {
                    window.count += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Drop expired windows once the map is large enough.
    fn prune_expired(&self, now: Instant) {
        if self.windows.len() <= PRUNE_THRESHOLD {
            return;
        }

        // Another caller is already pruning
        let Ok(mut last_pruned) = self.last_pruned.try_lock() else {
            return;
        };
        if now.saturating_duration_since(*last_pruned) < self.window {
            return;
        }
        *last_pruned = now;

        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started_at) < self.window);

        debug!(
            removed = before.saturating_sub(self.windows.len()),
            remaining = self.windows.len(),
            "Pruned expired rate limit windows"
        );
    }

    /// Number of clients with a counter, expired or not.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..5 {
            assert!(
                limiter.check_at("10.0.0.1", start + Duration::from_secs(i)),
                "request {} should be allowed",
                i + 1
            );
        }

        // Sixth request within the window is rejected
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(59)));
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at("10.0.0.1", start));
        }
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(30)));

        // Window measured from the first request, not the last
        let later = start + Duration::from_secs(60);
        assert!(limiter.check_at("10.0.0.1", later));

        // Fresh window starts at count one
        for _ in 0..4 {
            assert!(limiter.check_at("10.0.0.1", later));
        }
        assert!(!limiter.check_at("10.0.0.1", later));
    }

    #[test]
    fn test_rejected_requests_do_not_extend_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start));
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(59)));
        assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_concurrent_checks_are_all_counted() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(60)));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || limiter.check("10.0.0.1"))
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(allowed, 5);
    }

    #[test]
    fn test_expired_windows_are_pruned() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..10_000 {
            assert!(limiter.check_at(&format!("client-{i}"), start));
        }
        assert_eq!(limiter.tracked_clients(), 10_000);

        assert!(limiter.check_at("192.168.0.1", start + Duration::from_secs(3600)));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_pruning_keeps_live_windows() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        let later = start + Duration::from_secs(40);

        for i in 0..2_000 {
            assert!(limiter.check_at(&format!("old-{i}"), start));
        }
        for i in 0..500 {
            assert!(limiter.check_at(&format!("recent-{i}"), later));
        }

        let now = start + Duration::from_secs(61);
        assert!(limiter.check_at("192.168.0.1", now));
        assert_eq!(limiter.tracked_clients(), 501);

        // Live windows keep their counts
        assert!(!limiter.check_at("recent-0", now));
    }

    #[test]
    fn test_small_maps_are_not_pruned() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..10 {
            limiter.check_at(&format!("client-{i}"), start);
        }
        limiter.check_at("192.168.0.1", start + Duration::from_secs(3600));

        assert_eq!(limiter.tracked_clients(), 11);
    }

    #[test]
    fn test_permissive_rate_limit() {
        let limiter = RateLimiter::permissive();
        for _ in 0..100 {
            assert!(limiter.check("10.0.0.1"));
        }
    }
}
