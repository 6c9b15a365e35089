pub mod cleanup;
pub mod config;
pub mod cors;
pub mod rate_limit;
pub mod routes;

use rocket::{
    Build, Rocket,
    fairing::{Fairing, Info, Kind},
    routes,
};
use tracing::{info, warn};

use crate::{
    cleanup::start_cleanup_task,
    config::ServerConfig,
    cors::create_cors,
    rate_limit::{RateLimiter, create_rate_limiter},
    routes::{Games, create_game, flag_cell, get_game, open_cell, websocket_handler},
};

struct CleanupFairing;

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Cleanup Task",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        match (
            rocket.state::<Games>(),
            rocket.state::<RateLimiter>(),
            rocket.state::<ServerConfig>(),
        ) {
            (Some(games), Some(rate_limiter), Some(config)) => {
                info!("Starting cleanup task for game management");
                let games = games.clone();
                let rate_limiter = rate_limiter.clone();
                let interval = config.cleanup_interval;
                let timeout = config.inactive_game_timeout;
                tokio::spawn(async move {
                    start_cleanup_task(games, rate_limiter, interval, timeout).await;
                });
            }
            _ => warn!("Failed to get games state for cleanup task"),
        }
        Ok(rocket)
    }
}

/// Assembles the server: shared game storage, rate limiter, CORS, the
/// cleanup task and every route.
pub fn build_rocket(config: ServerConfig) -> Result<Rocket<Build>, rocket_cors::Error> {
    let cors = create_cors(&config.cors_allowed_origins)?;
    let games = Games::new();
    let rate_limiter = create_rate_limiter();

    info!("Initialized game storage and rate limiter");

    Ok(rocket::build()
        .attach(cors)
        .attach(CleanupFairing)
        .manage(games)
        .manage(rate_limiter)
        .manage(config)
        .mount(
            "/",
            routes![create_game, get_game, open_cell, flag_cell, websocket_handler],
        ))
}
