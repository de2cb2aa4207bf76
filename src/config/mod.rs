//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::feed::FeedSettings;
use crate::game::session::LoopSettings;
use crate::util::time::{DEFAULT_FRAME_RATE, DEFAULT_MAX_FRAME_DELTA};

/// Application configuration loaded from environment variables.
/// Everything has a default so a session can always start offline.
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Target ticks per second
    pub frame_rate: u32,
    /// Cap on a single tick's elapsed time
    pub max_frame_delta: Duration,
    /// Session wall-clock length, unset runs until interrupted
    pub session_duration: Option<Duration>,
    /// HUD log line interval
    pub hud_interval: Duration,

    /// Layout seed, unset draws from entropy
    pub world_seed: Option<u64>,
    pub building_count: usize,
    pub npc_count: usize,

    /// Text collaborator endpoint, unset uses fallbacks only
    pub feed_url: Option<String>,
    /// Bearer key for the collaborator
    pub feed_api_key: Option<String>,
    pub feed_model: String,
    pub feed_interval: Duration,
    pub feed_timeout: Duration,
    pub feed_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let frame_rate = parse_or(&lookup, "FRAME_RATE", DEFAULT_FRAME_RATE)?;
        if frame_rate == 0 {
            return Err(ConfigError::Invalid("FRAME_RATE"));
        }

        let feed_interval_secs = parse_or(&lookup, "FEED_INTERVAL_SECS", 8u64)?;
        if feed_interval_secs == 0 {
            return Err(ConfigError::Invalid("FEED_INTERVAL_SECS"));
        }

        let feed_capacity = parse_or(&lookup, "FEED_CAPACITY", 6usize)?;
        if feed_capacity == 0 {
            return Err(ConfigError::Invalid("FEED_CAPACITY"));
        }

        let hud_interval_ms = parse_or(&lookup, "HUD_INTERVAL_MS", 1000u64)?;
        if hud_interval_ms == 0 {
            return Err(ConfigError::Invalid("HUD_INTERVAL_MS"));
        }

        let feed_timeout_secs = parse_or(&lookup, "FEED_TIMEOUT_SECS", 5u64)?;
        if feed_timeout_secs == 0 {
            return Err(ConfigError::Invalid("FEED_TIMEOUT_SECS"));
        }

        let max_frame_delta_ms = parse_or(
            &lookup,
            "MAX_FRAME_DELTA_MS",
            DEFAULT_MAX_FRAME_DELTA.as_millis() as u64,
        )?;

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            frame_rate,
            max_frame_delta: Duration::from_millis(max_frame_delta_ms),
            session_duration: parse_opt::<u64, _>(&lookup, "SESSION_SECS")?.map(Duration::from_secs),
            hud_interval: Duration::from_millis(hud_interval_ms),

            world_seed: parse_opt(&lookup, "WORLD_SEED")?,
            building_count: parse_or(&lookup, "BUILDING_COUNT", 150usize)?,
            npc_count: parse_or(&lookup, "NPC_COUNT", 40usize)?,

            feed_url: non_empty(lookup("FEED_URL")),
            feed_api_key: non_empty(lookup("FEED_API_KEY")),
            feed_model: lookup("FEED_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            feed_interval: Duration::from_secs(feed_interval_secs),
            feed_timeout: Duration::from_secs(feed_timeout_secs),
            feed_capacity,
        })
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            frame_rate: self.frame_rate,
            max_frame_delta: self.max_frame_delta,
            duration: self.session_duration,
        }
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            period: self.feed_interval,
            timeout: self.feed_timeout,
            capacity: self.feed_capacity,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_opt<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(name)) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        None => Ok(None),
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, name)?.unwrap_or(default))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).expect("defaults are valid");
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.max_frame_delta, Duration::from_millis(100));
        assert_eq!(config.session_duration, None);
        assert_eq!(config.feed_url, None);
        assert_eq!(config.feed_capacity, 6);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("FRAME_RATE", "30"),
            ("SESSION_SECS", "12"),
            ("WORLD_SEED", "99"),
            ("FEED_URL", "http://localhost:9000/v1/chat/completions"),
            ("FEED_API_KEY", "  "),
        ])
        .expect("valid overrides");
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.session_duration, Some(Duration::from_secs(12)));
        assert_eq!(config.world_seed, Some(99));
        assert!(config.feed_url.is_some());
        assert_eq!(config.feed_api_key, None);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(load(&[("NPC_COUNT", "lots")]), Err(ConfigError::Invalid("NPC_COUNT"))));
        assert!(matches!(load(&[("FRAME_RATE", "0")]), Err(ConfigError::Invalid("FRAME_RATE"))));
        assert!(matches!(
            load(&[("FEED_CAPACITY", "0")]),
            Err(ConfigError::Invalid("FEED_CAPACITY"))
        ));
        assert!(matches!(
            load(&[("HUD_INTERVAL_MS", "0")]),
            Err(ConfigError::Invalid("HUD_INTERVAL_MS"))
        ));
        assert!(matches!(
            load(&[("FEED_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid("FEED_TIMEOUT_SECS"))
        ));
    }
}
