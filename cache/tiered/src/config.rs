//! Configuration types for cache levels.

use crate::error::{CacheError, CacheResult};
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Eviction policy of a single cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionPolicy {
    /// Least-recently-used: evict the entry touched longest ago.
    Recency,
    /// Least-frequently-used: evict a low-frequency entry, seeded by the
    /// cross-level ledger.
    Frequency,
}

impl EvictionPolicy {
    /// Short operator-facing name ("LRU" or "LFU").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recency => "LRU",
            Self::Frequency => "LFU",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    /// Accepts "lru"/"recency" and "lfu"/"frequency", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" => Ok(Self::Recency),
            "lfu" | "frequency" => Ok(Self::Frequency),
            _ => Err(CacheError::InvalidPolicy(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for EvictionPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid eviction policy: '{}' (expected 'lru' or 'lfu')",
                s
            ))
        })
    }
}

/// Configuration of one cache level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Maximum number of entries held by the level.
    pub capacity: usize,
    /// Eviction policy of the level.
    pub policy: EvictionPolicy,
}

impl LevelConfig {
    /// Create a level config.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self { capacity, policy }
    }

    /// Returns the capacity, rejecting zero.
    pub fn capacity_non_zero(&self) -> CacheResult<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or(CacheError::ZeroCapacity)
    }
}
