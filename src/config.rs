use std::env;
use std::time::Duration;

use crate::error::{CarouselError, Result};

/// Default IP-echo endpoint used by the health probe
pub const DEFAULT_PROBE_URL: &str = "https://api.ipify.org/?format=json";

/// Library configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Health probe configuration
    pub probe: ProbeConfig,
    /// Pool manager configuration
    pub pool: PoolConfig,
}

/// Health probe configuration
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// IP-echo endpoint that returns `{"ip": "..."}` as JSON
    pub url: String,
    /// Timeout for a single probe request
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROBE_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Pool manager configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum candidates examined per `get_proxy` call (0 = unbounded)
    pub max_draw_attempts: u32,
    /// Timeout applied to each source fetch during a refill
    pub source_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_draw_attempts: 100,
            source_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            probe: ProbeConfig {
                url: get_env_or("CAROUSEL_PROBE_URL", DEFAULT_PROBE_URL),
                timeout: Duration::from_secs(
                    get_env_or("CAROUSEL_PROBE_TIMEOUT", "5").parse().map_err(|_| {
                        CarouselError::InvalidConfig(
                            "CAROUSEL_PROBE_TIMEOUT must be a number of seconds".into(),
                        )
                    })?,
                ),
            },
            pool: PoolConfig {
                max_draw_attempts: get_env_or("CAROUSEL_MAX_DRAW_ATTEMPTS", "100")
                    .parse()
                    .map_err(|_| {
                        CarouselError::InvalidConfig(
                            "CAROUSEL_MAX_DRAW_ATTEMPTS must be a non-negative number".into(),
                        )
                    })?,
                source_timeout: Duration::from_secs(
                    get_env_or("CAROUSEL_SOURCE_TIMEOUT", "10")
                        .parse()
                        .map_err(|_| {
                            CarouselError::InvalidConfig(
                                "CAROUSEL_SOURCE_TIMEOUT must be a number of seconds".into(),
                            )
                        })?,
                ),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
