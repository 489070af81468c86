use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use dashmap::DashMap;

use crate::lifecycle::ShutdownCoordinator;

/// Idle clients are forgotten after this long.
pub const RETENTION: Duration = Duration::from_secs(3 * 60);

/// How often idle clients are swept.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    last_seen: Instant,
}

/// Per-client token bucket limiter.
///
/// Each key owns a bucket of `burst` tokens refilled continuously at `rps`
/// tokens per second. A bucket's read-modify-write and its eviction both
/// run under the map's shard lock for that key.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
    rps: f64,
    burst: u32,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(rps: f64, burst: u32, enabled: bool) -> Self {
        Self {
            buckets: DashMap::new(),
            rps,
            burst,
            enabled,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Consume one token for `key` if available.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }

        let capacity = f64::from(self.burst);
        let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: capacity,
            last_seen: now,
        });

        let elapsed = now.saturating_duration_since(bucket.last_seen).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rps).min(capacity);
        bucket.last_seen = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Seconds a denied client should wait for the next token.
    pub fn retry_after(&self) -> u64 {
        if self.rps <= 0.0 {
            return RETENTION.as_secs();
        }
        (1.0 / self.rps).ceil().max(1.0) as u64
    }

    /// Drop buckets idle for longer than [`RETENTION`].
    ///
    /// # Returns
    /// Number of evicted clients
    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) <= RETENTION);
        before.saturating_sub(self.buckets.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Sweep idle clients every [`PURGE_INTERVAL`] until draining begins.
    pub fn spawn_purger(
        limiter: Arc<Self>,
        coordinator: &ShutdownCoordinator,
    ) -> tokio::task::JoinHandle<()> {
        let draining = coordinator.draining();

        tokio::spawn(async move {
            tokio::pin!(draining);
            let mut ticker = tokio::time::interval(PURGE_INTERVAL);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut draining => break,
                    _ = ticker.tick() => {
                        let evicted = limiter.purge_idle_at(Instant::now());
                        if evicted > 0 {
                            tracing::debug!(
                                evicted,
                                remaining = limiter.tracked_clients(),
                                "Idle rate limit entries purged"
                            );
                        }
                    }
                }
            }

            tracing::debug!("Rate limit purger stopped");
        })
    }
}
