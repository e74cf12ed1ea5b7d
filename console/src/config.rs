//! Console configuration.

use serde::Deserialize;
use std::path::Path;
use tiered_cache::{CacheError, LevelConfig, MultiLevelCache};

/// Default configuration, printed by `--print-config`.
pub const DEFAULT_CONFIG: &str = r#"# Tiered Cache Console Configuration

[logging]
# Log level: "error", "warn", "info", "debug", "trace"
# Can be overridden with RUST_LOG environment variable
level = "warn"
# Log format: "pretty" (human-readable), "json", or "compact"
format = "pretty"
# Include timestamps
timestamps = true
# Include module target
target = false

# Cache levels, fastest first. Each level needs a positive capacity and an
# eviction policy: "lru" (least recently used) or "lfu" (least frequently used).
# More levels can be added at runtime with the `add` command.

[[level]]
capacity = 3
policy = "lru"

[[level]]
capacity = 5
policy = "lfu"
"#;

/// Console configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cache levels created at startup, fastest first.
    #[serde(default)]
    pub level: Vec<LevelConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        content.parse()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, level) in self.level.iter().enumerate() {
            level
                .capacity_non_zero()
                .map_err(|source| ConfigError::Level { level: i + 1, source })?;
        }
        Ok(())
    }

    /// Build a cache holding the configured levels.
    pub fn build_cache(&self) -> Result<MultiLevelCache, ConfigError> {
        let mut cache = MultiLevelCache::new();
        for (i, level) in self.level.iter().enumerate() {
            cache
                .add_level_config(level)
                .map_err(|source| ConfigError::Level { level: i + 1, source })?;
        }
        Ok(cache)
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Include the module target.
    #[serde(default)]
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            timestamps: true,
            target: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
    /// Single-line human-readable.
    Compact,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// The config file is not valid TOML for this schema.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A `[[level]]` entry is invalid.
    #[error("invalid level {level}: {source}")]
    Level {
        /// 1-based position of the entry.
        level: usize,
        /// Underlying cache error.
        #[source]
        source: CacheError,
    },
}
