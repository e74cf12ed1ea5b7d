//! A single capacity-bounded tier of the cache.
//!
//! - [`RecencyLevel`]: least-recently-used eviction
//! - [`FrequencyLevel`]: least-frequently-used eviction seeded by the ledger
//!
//! [`CacheLevel`] wraps the two behind one method surface so the cache can
//! hold a heterogeneous list of tiers.

mod frequency;
mod recency;

pub use frequency::FrequencyLevel;
pub use recency::RecencyLevel;

use crate::config::{EvictionPolicy, LevelConfig};
use crate::entry::CacheEntry;
use crate::error::CacheResult;
use crate::ledger::FrequencyLedger;
use std::fmt;

/// Cache level type enumeration.
pub enum CacheLevel {
    /// LRU-evicting level.
    Recency(RecencyLevel),
    /// LFU-evicting level.
    Frequency(FrequencyLevel),
}

impl CacheLevel {
    /// Build an empty level from its configuration.
    pub fn new(config: &LevelConfig) -> CacheResult<Self> {
        let capacity = config.capacity_non_zero()?.get();
        Ok(match config.policy {
            EvictionPolicy::Recency => Self::Recency(RecencyLevel::new(capacity)),
            EvictionPolicy::Frequency => Self::Frequency(FrequencyLevel::new(capacity)),
        })
    }

    /// The level's eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        match self {
            Self::Recency(_) => EvictionPolicy::Recency,
            Self::Frequency(_) => EvictionPolicy::Frequency,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Recency(level) => level.capacity(),
            Self::Frequency(level) => level.capacity(),
        }
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        match self {
            Self::Recency(level) => level.len(),
            Self::Frequency(level) => level.len(),
        }
    }

    /// Returns true if the level holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` is stored in this level.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::Recency(level) => level.contains(key),
            Self::Frequency(level) => level.contains(key),
        }
    }

    /// Take the value for `key` out of the level.
    ///
    /// A hit removes the entry: re-inserting it is up to the caller.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self {
            Self::Recency(level) => level.get(key),
            Self::Frequency(level) => level.get(key),
        }
    }

    /// Insert an entry, returning whatever it displaced.
    pub fn put(
        &mut self,
        key: String,
        value: String,
        ledger: &FrequencyLedger,
    ) -> Option<CacheEntry> {
        match self {
            Self::Recency(level) => level.put(key, value),
            Self::Frequency(level) => level.put(key, value, ledger),
        }
    }

    /// Remove and return the entry the policy would displace next.
    pub fn evict(&mut self) -> Option<CacheEntry> {
        match self {
            Self::Recency(level) => level.evict(),
            Self::Frequency(level) => level.evict(),
        }
    }

    /// Drop `key` from the level without consulting the policy.
    pub fn discard(&mut self, key: &str) -> Option<String> {
        match self {
            Self::Recency(level) => level.remove(key),
            Self::Frequency(level) => level.remove(key),
        }
    }

    /// Purge every key held by this level from the ledger.
    ///
    /// Called right before the level is dropped from the cache. Returns the
    /// number of ledger entries removed.
    pub fn teardown(&self, ledger: &mut FrequencyLedger) -> usize {
        match self {
            Self::Recency(level) => purge(level.keys(), ledger),
            Self::Frequency(level) => purge(level.keys(), ledger),
        }
    }

    /// Read-only snapshot of the level's contents.
    pub fn snapshot(&self) -> LevelSnapshot {
        let entries = match self {
            Self::Recency(level) => level
                .iter()
                .map(|(key, value)| SnapshotEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                    frequency: None,
                })
                .collect(),
            Self::Frequency(level) => level
                .iter()
                .map(|(key, value, frequency)| SnapshotEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                    frequency,
                })
                .collect(),
        };

        LevelSnapshot {
            policy: self.policy(),
            capacity: self.capacity(),
            entries,
        }
    }
}

fn purge<'a>(keys: impl Iterator<Item = &'a str>, ledger: &mut FrequencyLedger) -> usize {
    let mut purged = 0;
    for key in keys {
        if ledger.remove(key).is_some() {
            purged += 1;
        }
    }
    purged
}

/// One entry in a [`LevelSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Entry key.
    pub key: String,
    /// Entry value.
    pub value: String,
    /// Local frequency, for counted entries of frequency-policy levels.
    pub frequency: Option<u64>,
}

/// Point-in-time copy of a level's contents.
///
/// Recency levels list entries from LRU to MRU; frequency levels list them
/// in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSnapshot {
    /// Eviction policy of the level.
    pub policy: EvictionPolicy,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Entries in policy order.
    pub entries: Vec<SnapshotEntry>,
}

impl LevelSnapshot {
    /// Keys in policy order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// `(key, value)` pairs in policy order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
            .collect()
    }
}

impl fmt::Display for LevelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}/{}] {{",
            self.policy,
            self.entries.len(),
            self.capacity
        )?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", entry.key, entry.value)?;
            if let Some(frequency) = entry.frequency {
                write!(f, " (freq {})", frequency)?;
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn level(capacity: usize, policy: EvictionPolicy) -> CacheLevel {
        CacheLevel::new(&LevelConfig::new(capacity, policy)).expect("valid level")
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let result = CacheLevel::new(&LevelConfig::new(0, EvictionPolicy::Recency));
        assert!(matches!(result, Err(CacheError::ZeroCapacity)));
    }

    #[test]
    fn test_policy_and_capacity() {
        let lru = level(3, EvictionPolicy::Recency);
        assert_eq!(lru.policy(), EvictionPolicy::Recency);
        assert_eq!(lru.capacity(), 3);
        assert!(lru.is_empty());

        let lfu = level(2, EvictionPolicy::Frequency);
        assert_eq!(lfu.policy(), EvictionPolicy::Frequency);
        assert_eq!(lfu.capacity(), 2);
    }

    #[test]
    fn test_teardown_purges_only_own_keys() {
        let mut ledger = FrequencyLedger::new();
        for key in ["a", "b", "c"] {
            ledger.increment(key);
        }

        let mut lru = level(2, EvictionPolicy::Recency);
        lru.put("a".to_string(), "1".to_string(), &ledger);
        lru.put("b".to_string(), "2".to_string(), &ledger);

        assert_eq!(lru.teardown(&mut ledger), 2);
        assert_eq!(ledger.count("a"), None);
        assert_eq!(ledger.count("b"), None);
        assert_eq!(ledger.count("c"), Some(1));

        // teardown does not empty the level itself
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let ledger = FrequencyLedger::new();
        let mut lru = level(2, EvictionPolicy::Recency);
        lru.put("a".to_string(), "1".to_string(), &ledger);
        lru.put("b".to_string(), "2".to_string(), &ledger);

        let first = lru.snapshot();
        let second = lru.snapshot();
        assert_eq!(first, second);
        assert_eq!(first.pairs(), vec![("a", "1"), ("b", "2")]);

        // "a" is still the LRU entry
        assert_eq!(lru.evict(), Some(CacheEntry::new("a", "1")));
    }

    #[test]
    fn test_snapshot_display() {
        let mut ledger = FrequencyLedger::new();
        ledger.increment("x");

        let mut lfu = level(2, EvictionPolicy::Frequency);
        lfu.put("x".to_string(), "10".to_string(), &ledger);
        assert_eq!(lfu.snapshot().to_string(), "[LFU 1/2] {x=10 (freq 1)}");

        let mut lru = level(3, EvictionPolicy::Recency);
        lru.put("a".to_string(), "1".to_string(), &ledger);
        lru.put("b".to_string(), "2".to_string(), &ledger);
        assert_eq!(lru.snapshot().to_string(), "[LRU 2/3] {a=1, b=2}");

        assert_eq!(
            level(1, EvictionPolicy::Recency).snapshot().to_string(),
            "[LRU 0/1] {}"
        );
    }

    #[test]
    fn test_discard() {
        let ledger = FrequencyLedger::new();
        let mut lfu = level(2, EvictionPolicy::Frequency);
        lfu.put("a".to_string(), "1".to_string(), &ledger);

        assert_eq!(lfu.discard("a"), Some("1".to_string()));
        assert_eq!(lfu.discard("a"), None);
        assert!(lfu.is_empty());
    }
}
