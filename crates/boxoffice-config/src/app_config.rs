//! Application configuration structures.

use boxoffice_core::{BoxOfficeError, BoxOfficeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Read-through cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Rejects values the runtime cannot honour.
    pub fn validate(&self) -> BoxOfficeResult<()> {
        self.cache.validate()
    }
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "boxoffice".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Cache configuration, one section per namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// When disabled, reads go straight to the loader.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "NamespaceCacheConfig::events")]
    pub events: NamespaceCacheConfig,
    #[serde(default = "NamespaceCacheConfig::users")]
    pub users: NamespaceCacheConfig,
    #[serde(default = "NamespaceCacheConfig::bookings")]
    pub bookings: NamespaceCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            events: NamespaceCacheConfig::events(),
            users: NamespaceCacheConfig::users(),
            bookings: NamespaceCacheConfig::bookings(),
        }
    }
}

/// Longest TTL or sweep interval accepted from configuration (one week).
pub const MAX_CACHE_SECS: u64 = 7 * 24 * 60 * 60;

impl CacheConfig {
    /// Fails if any namespace has a zero or out-of-range TTL or sweep
    /// interval.
    pub fn validate(&self) -> BoxOfficeResult<()> {
        for (name, ns) in [
            ("events", &self.events),
            ("users", &self.users),
            ("bookings", &self.bookings),
        ] {
            if ns.ttl_secs == 0 {
                return Err(BoxOfficeError::configuration(format!(
                    "cache.{name}.ttl_secs must be greater than zero"
                )));
            }
            if ns.sweep_interval_secs == 0 {
                return Err(BoxOfficeError::configuration(format!(
                    "cache.{name}.sweep_interval_secs must be greater than zero"
                )));
            }
            if ns.ttl_secs > MAX_CACHE_SECS || ns.sweep_interval_secs > MAX_CACHE_SECS {
                return Err(BoxOfficeError::configuration(format!(
                    "cache.{name} durations cannot exceed {MAX_CACHE_SECS} seconds"
                )));
            }
        }
        Ok(())
    }
}

/// Per-namespace TTL and expiry sweep cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceCacheConfig {
    /// Default time-to-live for entries, in seconds.
    pub ttl_secs: u64,
    /// How often expired entries are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl NamespaceCacheConfig {
    #[must_use]
    pub const fn new(ttl_secs: u64, sweep_interval_secs: u64) -> Self {
        Self {
            ttl_secs,
            sweep_interval_secs,
        }
    }

    fn events() -> Self {
        Self::new(300, 60)
    }

    fn users() -> Self {
        Self::new(600, 120)
    }

    fn bookings() -> Self {
        Self::new(180, 60)
    }

    /// Returns the TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Returns the sweep interval as a Duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
    /// Install the Prometheus exporter.
    pub metrics_enabled: bool,
    /// Address the Prometheus exporter listens on.
    pub metrics_addr: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_addr: "0.0.0.0:9464".to_string(),
        }
    }
}

const fn default_true() -> bool {
    true
}
