//! Runtime settings resolved from the environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::aviation::{AviationConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::cache::{CacheConfig, DEFAULT_MAX_CAPACITY, DEFAULT_TTL_SECS};
use crate::query::{DEFAULT_AIRLINE_IATA, DEFAULT_LIMIT};

/// Environment variable holding the aviationstack access key.
pub const API_KEY_VAR: &str = "AVIATIONSTACK_API_KEY";

/// Errors while resolving settings. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The access key is missing or empty
    #[error("AVIATIONSTACK_API_KEY is missing in your environment")]
    MissingCredential,

    /// A variable is set but cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Resolved settings for the fetch pipeline.
#[derive(Clone)]
pub struct Settings {
    /// aviationstack access key
    pub api_key: String,
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Carrier filter for arrivals and realtime queries
    pub airline_iata: String,
    /// Result limit when none is given
    pub default_limit: u32,
    /// Cache bucket width in seconds; zero or negative disables caching
    pub cache_ttl_secs: i64,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let base_url = lookup("BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let airline_iata =
            lookup("AIRLINE_IATA").unwrap_or_else(|| DEFAULT_AIRLINE_IATA.to_string());

        Ok(Self {
            api_key,
            base_url,
            airline_iata,
            default_limit: parse_var(&lookup, "DEFAULT_LIMIT", DEFAULT_LIMIT)?,
            cache_ttl_secs: parse_var(&lookup, "CACHE_TTL", DEFAULT_TTL_SECS)?,
            cache_capacity: parse_var(&lookup, "CACHE_CAPACITY", DEFAULT_MAX_CAPACITY)?,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Client configuration for [`AviationClient`](crate::aviation::AviationClient).
    pub fn aviation_config(&self) -> AviationConfig {
        AviationConfig::new(&self.api_key)
            .with_base_url(&self.base_url)
            .with_timeout(self.request_timeout_secs)
    }

    /// Configuration for the request cache.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_secs: self.cache_ttl_secs,
            max_capacity: self.cache_capacity,
        }
    }

    /// Cache TTL as a duration; zero when caching is disabled.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.cache_ttl_secs).unwrap_or(0))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("airline_iata", &self.airline_iata)
            .field("default_limit", &self.default_limit)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
