use std::{env, fmt::Display, str::FromStr, time::Duration};

use minesweeper_engine::usecase::DEFAULT_SAVE_ATTEMPTS;
use tracing::warn;

/// Server settings read from the environment once at startup.
///
/// Rocket's own settings (address, port, limits) still come from
/// `Rocket.toml` and `ROCKET_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `CORS_ALLOWED_ORIGINS`, comma separated.
    pub cors_allowed_origins: Vec<String>,
    /// `RATE_LIMIT_GAMES_PER_MINUTE`, per client IP.
    pub games_per_minute: u32,
    /// `CLEANUP_INTERVAL_SECONDS`
    pub cleanup_interval: Duration,
    /// `INACTIVE_GAME_TIMEOUT_SECONDS`
    pub inactive_game_timeout: Duration,
    /// `SAVE_RETRY_ATTEMPTS`
    pub save_attempts: usize,
    /// `MAX_BOARD_CELLS`, largest `width * height` accepted by `POST /create`.
    pub max_board_cells: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            games_per_minute: 10,
            cleanup_interval: Duration::from_secs(60),
            inactive_game_timeout: Duration::from_secs(600),
            save_attempts: DEFAULT_SAVE_ATTEMPTS,
            max_board_cells: 10_000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allowed_origins);

        Self {
            cors_allowed_origins,
            games_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_GAMES_PER_MINUTE",
                defaults.games_per_minute,
            ),
            cleanup_interval: Duration::from_secs(parse_or(
                &lookup,
                "CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval.as_secs(),
            )),
            inactive_game_timeout: Duration::from_secs(parse_or(
                &lookup,
                "INACTIVE_GAME_TIMEOUT_SECONDS",
                defaults.inactive_game_timeout.as_secs(),
            )),
            save_attempts: parse_or(&lookup, "SAVE_RETRY_ATTEMPTS", defaults.save_attempts),
            max_board_cells: parse_or(&lookup, "MAX_BOARD_CELLS", defaults.max_board_cells),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("RATE_LIMIT_GAMES_PER_MINUTE", "3"),
            ("INACTIVE_GAME_TIMEOUT_SECONDS", "30"),
            ("SAVE_RETRY_ATTEMPTS", "5"),
            ("MAX_BOARD_CELLS", "2500"),
        ]);

        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.games_per_minute, 3);
        assert_eq!(config.inactive_game_timeout, Duration::from_secs(30));
        assert_eq!(config.save_attempts, 5);
        assert_eq!(config.max_board_cells, 2500);
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = config_from(&[("RATE_LIMIT_GAMES_PER_MINUTE", "lots")]);

        assert_eq!(config.games_per_minute, 10);
    }
}
