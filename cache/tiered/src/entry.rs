//! Key/value pair moved between levels.

use std::fmt;

/// A cached key/value pair.
///
/// This is the unit that levels hand back when they displace something, and
/// the unit the cache re-offers to the next level during a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Entry key.
    pub key: String,
    /// Entry value.
    pub value: String,
}

impl CacheEntry {
    /// Create a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
