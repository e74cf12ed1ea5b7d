//! Cross-level access frequency record.
//!
//! The [`FrequencyLedger`] counts how many times each key has been inserted
//! through [`MultiLevelCache::put`](crate::MultiLevelCache::put), including
//! the re-insertions performed by promotion. It is owned by the cache and
//! lent to levels for the duration of a single operation; frequency-policy
//! levels read it to seed their eviction scan.
//!
//! Counts outlive the entries they describe. Eviction and cascade leave the
//! ledger alone; only removing a level purges the keys that level held.

use ahash::AHashMap;

/// Mapping of key to insertion count, shared by every level of a cache.
#[derive(Debug, Default, Clone)]
pub struct FrequencyLedger {
    counts: AHashMap<String, u64>,
}

impl FrequencyLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `key`, returning the new count.
    pub fn increment(&mut self, key: &str) -> u64 {
        if let Some(count) = self.counts.get_mut(key) {
            *count = count.saturating_add(1);
            return *count;
        }
        self.counts.insert(key.to_string(), 1);
        1
    }

    /// Current count for `key`, if it has ever been recorded.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Forget `key`, returning its last count.
    pub fn remove(&mut self, key: &str) -> Option<u64> {
        self.counts.remove(key)
    }

    /// Number of keys tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(key, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }
}
