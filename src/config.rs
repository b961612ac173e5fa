// Runtime configuration
//
// Read from the environment (after loading `.env`), falling back to
// logged defaults for anything unset or unparsable.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Settings the coordinator needs at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Deadline for one task execution unless the request overrides it
    pub task_timeout: Duration,
    /// Trailing window for the recent-communications count
    pub communication_window: Duration,
    /// Delay applied by the simulated executor
    pub simulated_latency: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            task_timeout: Duration::from_secs(60),
            communication_window: Duration::from_secs(5 * 60),
            simulated_latency: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub coordinator: CoordinatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present and reads the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port: u16 = parse_or(&lookup, "PORT", defaults.addr.port());
        let timeout_secs: u64 = parse_or(
            &lookup,
            "TASK_TIMEOUT_SECS",
            defaults.coordinator.task_timeout.as_secs(),
        );
        let window_secs: u64 = parse_or(
            &lookup,
            "COMMUNICATION_WINDOW_SECS",
            defaults.coordinator.communication_window.as_secs(),
        );
        let latency_ms: u64 = parse_or(&lookup, "SIMULATED_LATENCY_MS", 0);

        Self {
            addr: SocketAddr::new(host, port),
            coordinator: CoordinatorConfig {
                task_timeout: Duration::from_secs(timeout_secs),
                communication_window: Duration::from_secs(window_secs),
                simulated_latency: Duration::from_millis(latency_ms),
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[]));

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.coordinator.task_timeout, Duration::from_secs(60));
        assert_eq!(config.coordinator.communication_window, Duration::from_secs(300));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TASK_TIMEOUT_SECS", "5"),
            ("SIMULATED_LATENCY_MS", "250"),
        ]));

        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.coordinator.task_timeout, Duration::from_secs(5));
        assert_eq!(config.coordinator.simulated_latency, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));

        assert_eq!(config.addr.port(), 3000);
    }
}
