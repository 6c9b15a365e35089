use std::time::Duration;

use minesweeper_engine::InMemoryGameRepository;
use tokio::time;
use tracing::{debug, info};

use crate::rate_limit::{RateLimiter, prune_idle_buckets};

pub async fn start_cleanup_task(
    games: InMemoryGameRepository,
    rate_limiter: RateLimiter,
    cleanup_interval: Duration,
    inactive_timeout: Duration,
) {
    // tokio panics on a zero period.
    let cleanup_interval = cleanup_interval.max(Duration::from_secs(1));
    let mut interval = time::interval(cleanup_interval);

    info!(
        "Started game cleanup task: checking every {}s, inactive timeout: {}s",
        cleanup_interval.as_secs(),
        inactive_timeout.as_secs()
    );

    loop {
        interval.tick().await;
        cleanup_games(&games, inactive_timeout);
        cleanup_rate_limiter(&rate_limiter);
    }
}

fn cleanup_rate_limiter(rate_limiter: &RateLimiter) {
    let removed_count = prune_idle_buckets(rate_limiter);
    if removed_count > 0 {
        debug!(
            "Dropped {} idle rate-limit buckets, {} remaining",
            removed_count,
            rate_limiter.len()
        );
    }
}

fn cleanup_games(games: &InMemoryGameRepository, inactive_timeout: Duration) {
    let removed_count = games.evict_idle(inactive_timeout);

    if removed_count > 0 {
        info!(
            "Cleaned up {} inactive games, {} remaining",
            removed_count,
            games.len()
        );
    } else {
        debug!("No inactive games to clean up");
    }
}
