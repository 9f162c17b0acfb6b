use std::env;

use clap::ValueEnum;

/// Storage backend holding the read models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Entities kept as values in a map.
    #[default]
    Memory,
    /// Entities kept as JSON documents; needs an entity factory.
    Document,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Document => "document",
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Read-model backend (default: memory)
    pub storage: StorageBackend,
    /// Whether read models are wrapped in the cache decorator (default: true)
    pub cache_enabled: bool,
    /// Namespace the demo runs in (default: "default")
    pub namespace: String,
    /// Log output format (default: pretty)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `READCACHE_STORAGE` - `memory` or `document` (default: memory)
    /// - `READCACHE_CACHE_ENABLED` - `true` or `false` (default: true)
    /// - `READCACHE_NAMESPACE` - Namespace of the demo (default: "default")
    /// - `READCACHE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            storage: lookup("READCACHE_STORAGE")
                .and_then(|v| StorageBackend::from_str(&v, true).ok())
                .unwrap_or_default(),
            cache_enabled: lookup("READCACHE_CACHE_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            namespace: lookup("READCACHE_NAMESPACE")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| readcache_core::context::DEFAULT_NAMESPACE.to_string()),
            log_format: lookup("READCACHE_LOG_FORMAT")
                .and_then(|v| LogFormat::from_str(&v, true).ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
