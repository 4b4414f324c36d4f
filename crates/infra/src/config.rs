//! Configuration loading from the process environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use catalog_events::DEFAULT_QUEUE_CAPACITY;

use crate::catalog::pagination::DEFAULT_MAX_LIMIT;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `SUBSCRIBER_QUEUE_CAPACITY`: per-subscriber outbound queue size.
    pub subscriber_queue_capacity: usize,
    /// `MAX_PAGE_LIMIT`: upper clamp for `limit` on paginated reads.
    pub max_page_limit: u32,
    /// `SSE_KEEP_ALIVE_SECS`
    pub keep_alive: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            subscriber_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_page_limit: DEFAULT_MAX_LIMIT,
            keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?;
        let subscriber_queue_capacity =
            positive_or(&lookup, "SUBSCRIBER_QUEUE_CAPACITY", defaults.subscriber_queue_capacity)?;
        let max_page_limit = positive_or(&lookup, "MAX_PAGE_LIMIT", defaults.max_page_limit)?;
        let keep_alive_secs = positive_or(&lookup, "SSE_KEEP_ALIVE_SECS", DEFAULT_KEEP_ALIVE_SECS)?;

        Ok(Self {
            bind_addr,
            subscriber_queue_capacity,
            max_page_limit,
            keep_alive: Duration::from_secs(keep_alive_secs),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn positive_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let value = parse_or(lookup, key, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: lookup(key).unwrap_or_default(),
        });
    }
    Ok(value)
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
    fn empty_environment_gives_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn values_are_read() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("SUBSCRIBER_QUEUE_CAPACITY", "8"),
            ("MAX_PAGE_LIMIT", "25"),
            ("SSE_KEEP_ALIVE_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.subscriber_queue_capacity, 8);
        assert_eq!(cfg.max_page_limit, 25);
        assert_eq!(cfg.keep_alive, Duration::from_secs(5));
    }

    #[test]
    fn malformed_or_zero_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "BIND_ADDR",
                value: "nowhere".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[("MAX_PAGE_LIMIT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MAX_PAGE_LIMIT", .. }));
    }
}
