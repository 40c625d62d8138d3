use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::agents::CoordinatorConfig;

/// Live event stream tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Idle interval between keep-alive comments
    pub heartbeat: Duration,
    /// Queued events beyond which a slow consumer is disconnected
    pub max_backlog: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            heartbeat: Duration::from_secs(15),
            max_backlog: 1024,
        }
    }
}

/// Process configuration, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub roster_path: PathBuf,
    /// Teams generated when a start request supplies none
    pub team_count: usize,
    /// How many generated teams are human-controlled
    pub human_teams: usize,
    pub initial_purse: Decimal,
    pub coordinator: CoordinatorConfig,
    pub stream: StreamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            roster_path: PathBuf::from("data/players.json"),
            team_count: 10,
            human_teams: 1,
            initial_purse: Decimal::from(1000),
            coordinator: CoordinatorConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads `AUCTION_*` variables
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    ///
    /// Missing variables take their default; malformed ones are logged and
    /// replaced by the default as well.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let coordinator_defaults = defaults.coordinator.clone();

        let min_delay = Duration::from_millis(parse_or(
            &lookup,
            "AUCTION_AI_MIN_DELAY_MS",
            coordinator_defaults.min_delay.as_millis() as u64,
        ));
        let mut max_delay = Duration::from_millis(parse_or(
            &lookup,
            "AUCTION_AI_MAX_DELAY_MS",
            coordinator_defaults.max_delay.as_millis() as u64,
        ));
        if max_delay < min_delay {
            tracing::warn!(?min_delay, ?max_delay, "AI max delay below min delay, using min delay");
            max_delay = min_delay;
        }

        let seed = lookup("AUCTION_AI_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "AUCTION_AI_SEED is not a number, ignoring");
                None
            }
        });

        let team_count = parse_or(&lookup, "AUCTION_TEAM_COUNT", defaults.team_count);
        let team_count = if team_count == 0 {
            tracing::warn!("AUCTION_TEAM_COUNT must be positive, using default");
            defaults.team_count
        } else {
            team_count
        };

        Self {
            bind_addr: parse_or(&lookup, "AUCTION_BIND_ADDR", defaults.bind_addr),
            roster_path: lookup("AUCTION_ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.roster_path),
            team_count,
            human_teams: parse_or(&lookup, "AUCTION_HUMAN_TEAMS", defaults.human_teams),
            initial_purse: parse_or(&lookup, "AUCTION_INITIAL_PURSE", defaults.initial_purse),
            coordinator: CoordinatorConfig {
                min_delay,
                max_delay,
                max_round_iterations: parse_or(
                    &lookup,
                    "AUCTION_AI_MAX_ITERATIONS",
                    coordinator_defaults.max_round_iterations,
                ),
                seed,
            },
            stream: StreamConfig {
                heartbeat: Duration::from_secs(parse_or(
                    &lookup,
                    "AUCTION_STREAM_HEARTBEAT_SECS",
                    defaults.stream.heartbeat.as_secs(),
                )),
                max_backlog: parse_or(
                    &lookup,
                    "AUCTION_STREAM_MAX_BACKLOG",
                    defaults.stream.max_backlog,
                ),
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "invalid value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("AUCTION_BIND_ADDR", "127.0.0.1:8080"),
            ("AUCTION_ROSTER_PATH", "/tmp/roster.json"),
            ("AUCTION_TEAM_COUNT", "4"),
            ("AUCTION_HUMAN_TEAMS", "0"),
            ("AUCTION_INITIAL_PURSE", "2500.50"),
            ("AUCTION_AI_MIN_DELAY_MS", "0"),
            ("AUCTION_AI_MAX_DELAY_MS", "5"),
            ("AUCTION_AI_MAX_ITERATIONS", "50"),
            ("AUCTION_AI_SEED", "42"),
            ("AUCTION_STREAM_HEARTBEAT_SECS", "3"),
            ("AUCTION_STREAM_MAX_BACKLOG", "16"),
        ]);

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.roster_path, PathBuf::from("/tmp/roster.json"));
        assert_eq!(config.team_count, 4);
        assert_eq!(config.human_teams, 0);
        assert_eq!(config.initial_purse.to_string(), "2500.50");
        assert_eq!(config.coordinator.min_delay, Duration::ZERO);
        assert_eq!(config.coordinator.max_delay, Duration::from_millis(5));
        assert_eq!(config.coordinator.max_round_iterations, 50);
        assert_eq!(config.coordinator.seed, Some(42));
        assert_eq!(config.stream.heartbeat, Duration::from_secs(3));
        assert_eq!(config.stream.max_backlog, 16);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("AUCTION_TEAM_COUNT", "many"),
            ("AUCTION_INITIAL_PURSE", "lots"),
            ("AUCTION_AI_SEED", "random"),
        ]);

        assert_eq!(config.team_count, 10);
        assert_eq!(config.initial_purse, Decimal::from(1000));
        assert_eq!(config.coordinator.seed, None);
    }

    #[test]
    fn zero_team_count_is_rejected() {
        assert_eq!(config_from(&[("AUCTION_TEAM_COUNT", "0")]).team_count, 10);
    }

    #[test]
    fn inverted_delay_range_collapses_to_min() {
        let config = config_from(&[
            ("AUCTION_AI_MIN_DELAY_MS", "400"),
            ("AUCTION_AI_MAX_DELAY_MS", "100"),
        ]);

        assert_eq!(config.coordinator.min_delay, Duration::from_millis(400));
        assert_eq!(config.coordinator.max_delay, Duration::from_millis(400));
    }
}
