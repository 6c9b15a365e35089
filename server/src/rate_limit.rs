use std::{
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::http::Status;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_rate: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32, refill_interval: Duration) -> Self {
        debug!(
            "Creating new token bucket: capacity={}, refill_rate={}, interval={}s",
            capacity,
            refill_rate,
            refill_interval.as_secs()
        );
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_rate,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens > 0 {
            self.tokens -= 1;
            debug!("Token consumed, remaining: {}", self.tokens);
            true
        } else {
            debug!("No tokens available for consumption");
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let interval_ms = self.refill_interval.as_millis().max(1);
        let intervals = elapsed.as_millis() / interval_ms;

        if intervals > 0 {
            let old_tokens = self.tokens;
            let tokens_to_add = u32::try_from(intervals)
                .unwrap_or(u32::MAX)
                .saturating_mul(self.refill_rate);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.capacity);
            self.last_refill = now;
            if self.tokens != old_tokens {
                debug!(
                    "Token bucket refilled: {} -> {} tokens",
                    old_tokens, self.tokens
                );
            }
        }
    }

    /// A bucket untouched for a full interval would refill completely on
    /// its next use, so it is indistinguishable from a new one.
    fn is_idle(&self) -> bool {
        self.last_refill.elapsed() >= self.refill_interval
    }
}

/// Game-creation buckets keyed by client address.
pub type RateLimiter = Arc<DashMap<IpAddr, TokenBucket>>;

pub fn create_rate_limiter() -> RateLimiter {
    Arc::new(DashMap::new())
}

/// Takes one game-creation token for `ip`; buckets refill to
/// `games_per_minute` every minute.
#[instrument(level = "trace", skip(rate_limiter))]
pub fn check_rate_limit(
    rate_limiter: &RateLimiter,
    ip: IpAddr,
    games_per_minute: u32,
) -> Result<(), Status> {
    let refill_interval = Duration::from_secs(60);

    let mut entry = rate_limiter
        .entry(ip)
        .or_insert_with(|| TokenBucket::new(games_per_minute, games_per_minute, refill_interval));

    if entry.try_consume() {
        debug!("Rate limit check passed for {}", ip);
        Ok(())
    } else {
        warn!("Rate limit exceeded for {} - rejecting request", ip);
        Err(Status::TooManyRequests)
    }
}

/// Drops buckets that have been idle for a full refill interval and
/// returns how many were removed.
pub fn prune_idle_buckets(rate_limiter: &RateLimiter) -> usize {
    let before = rate_limiter.len();
    rate_limiter.retain(|_, bucket| !bucket.is_idle());
    before.saturating_sub(rate_limiter.len())
}
