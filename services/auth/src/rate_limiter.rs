//! Login throttling keyed by username
//!
//! Each key gets a budget of attempts per window. Spending the whole budget
//! inside one window bans the key for `ban_duration_seconds`. Keys that are
//! neither banned nor inside a live window are swept out, so one-off
//! usernames do not accumulate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
        }
    }
}

impl RateLimiterConfig {
    fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    fn ban(&self) -> Duration {
        Duration::from_secs(self.ban_duration_seconds)
    }
}

#[derive(Debug)]
struct Attempts {
    count: u32,
    window_start: Instant,
    banned_until: Option<Instant>,
}

impl Attempts {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
            banned_until: None,
        }
    }

    fn is_banned(&self, now: Instant) -> bool {
        self.banned_until.is_some_and(|until| now < until)
    }

    /// The next attempt would start from a clean slate
    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        match self.banned_until {
            Some(until) => now >= until,
            None => now.duration_since(self.window_start) >= window,
        }
    }
}

#[derive(Debug)]
struct Ledger {
    keys: HashMap<String, Attempts>,
    last_sweep: Instant,
}

/// Login attempt limiter keyed by username
///
/// Keys are counted whether or not the user exists, so throttling never
/// reveals which usernames are registered.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    ledger: Arc<Mutex<Ledger>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            ledger: Arc::new(Mutex::new(Ledger {
                keys: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Record an attempt for `key` and report whether it may proceed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut ledger = self.ledger.lock().await;
        let now = Instant::now();
        let window = self.config.window();

        // Sweep at most once per window
        if now.duration_since(ledger.last_sweep) >= window {
            let before = ledger.keys.len();
            ledger.keys.retain(|_, attempts| !attempts.is_stale(now, window));
            ledger.last_sweep = now;
            debug!(
                evicted = before - ledger.keys.len(),
                remaining = ledger.keys.len(),
                "Swept login throttle"
            );
        }

        let attempts = ledger
            .keys
            .entry(key.to_string())
            .or_insert_with(|| Attempts::fresh(now));

        if attempts.is_banned(now) {
            return false;
        }

        // A lapsed ban or window starts the count over
        if attempts.is_stale(now, window) {
            *attempts = Attempts::fresh(now);
        }

        if attempts.count >= self.config.max_attempts {
            attempts.banned_until = Some(now + self.config.ban());
            warn!(
                "Throttled logins for {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        attempts.count += 1;
        true
    }

    /// Forget all attempts for `key`, e.g. after a successful login
    pub async fn reset(&self, key: &str) {
        self.ledger.lock().await.keys.remove(key);
    }

    /// Number of keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.ledger.lock().await.keys.len()
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32, window_seconds: u64, ban_duration_seconds: u64) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds,
            ban_duration_seconds,
        })
    }

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let limiter = limiter(3, 300, 3600);

        for _ in 0..3 {
            assert!(limiter.is_allowed("john").await);
        }
        assert!(!limiter.is_allowed("john").await);
        assert!(!limiter.is_allowed("john").await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = limiter(1, 300, 3600);

        assert!(limiter.is_allowed("john").await);
        assert!(!limiter.is_allowed("john").await);
        assert!(limiter.is_allowed("jane").await);
    }

    #[tokio::test]
    async fn test_reset_clears_attempts() {
        let limiter = limiter(2, 300, 3600);

        assert!(limiter.is_allowed("john").await);
        assert!(limiter.is_allowed("john").await);
        limiter.reset("john").await;
        assert!(limiter.is_allowed("john").await);
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn test_ban_expires() {
        let limiter = limiter(1, 300, 0);

        assert!(limiter.is_allowed("john").await);
        assert!(!limiter.is_allowed("john").await);
        // Zero-length ban has already lapsed
        assert!(limiter.is_allowed("john").await);
    }

    #[tokio::test]
    async fn test_lapsed_keys_are_evicted() {
        let limiter = limiter(5, 0, 0);

        for i in 0..10_000 {
            assert!(limiter.is_allowed(&format!("ghost-{i}")).await);
        }

        assert!(limiter.tracked_keys().await <= 1);
    }

    #[tokio::test]
    async fn test_banned_keys_survive_the_sweep() {
        let limiter = limiter(1, 0, 3600);

        assert!(limiter.is_allowed("john").await);
        if let Some(attempts) = limiter.ledger.lock().await.keys.get_mut("john") {
            attempts.banned_until = Some(Instant::now() + Duration::from_secs(60));
        }

        for i in 0..100 {
            assert!(limiter.is_allowed(&format!("ghost-{i}")).await);
        }

        assert_eq!(limiter.tracked_keys().await, 2);
        assert!(!limiter.is_allowed("john").await);
    }

    #[test]
    fn test_default_config() {
        let limiter = RateLimiter::new(RateLimiterConfig::default());
        assert_eq!(limiter.config().max_attempts, 5);
        assert_eq!(limiter.config().window_seconds, 300);
    }
}
