//! MultiLevelCache - orchestrating cache with multiple levels.
//!
//! [`MultiLevelCache`] manages an ordered list of [`CacheLevel`]s, providing:
//! - Unified write path (all writes go to level 0)
//! - Cascading eviction (a displaced entry is re-offered to the next level)
//! - Promotion on read (a hit at any level is re-inserted into level 0)
//! - A single [`FrequencyLedger`] lent to every level

use crate::config::{EvictionPolicy, LevelConfig};
use crate::entry::CacheEntry;
use crate::error::{CacheError, CacheResult};
use crate::ledger::FrequencyLedger;
use crate::level::{CacheLevel, LevelSnapshot};
use crate::metrics::*;
use std::fmt;

/// Result of a successful insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Every displaced entry settled in some level.
    Stored,
    /// The cascade ran past the last level; the carried entry was dropped.
    ///
    /// This is a normal outcome, not an error.
    StorageFull(CacheEntry),
}

impl PutOutcome {
    /// Returns true if an entry fell off the last level.
    pub fn is_storage_full(&self) -> bool {
        matches!(self, Self::StorageFull(_))
    }
}

/// Result of evicting from a specific level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    /// Entry removed from the level.
    pub entry: CacheEntry,
    /// What happened when it cascaded into the following levels.
    pub outcome: PutOutcome,
}

/// An ordered hierarchy of cache levels sharing one frequency ledger.
///
/// Level 0 is checked first and receives every insertion. Keys live in at
/// most one level at a time.
#[derive(Default)]
pub struct MultiLevelCache {
    levels: Vec<CacheLevel>,
    ledger: FrequencyLedger,
}

impl MultiLevelCache {
    /// Create a cache with no levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with the given levels, in order.
    ///
    /// All configs are validated before any level is built.
    pub fn with_levels<'a, I>(configs: I) -> CacheResult<Self>
    where
        I: IntoIterator<Item = &'a LevelConfig>,
    {
        let levels = configs
            .into_iter()
            .map(CacheLevel::new)
            .collect::<CacheResult<Vec<_>>>()?;

        let mut cache = Self::new();
        for level in levels {
            cache.push_level(level);
        }
        Ok(cache)
    }

    /// Append a level as the new slowest tier, returning its index.
    pub fn add_level(&mut self, capacity: usize, policy: EvictionPolicy) -> CacheResult<usize> {
        self.add_level_config(&LevelConfig::new(capacity, policy))
    }

    /// Append a level described by `config`, returning its index.
    pub fn add_level_config(&mut self, config: &LevelConfig) -> CacheResult<usize> {
        let level = CacheLevel::new(config)?;
        Ok(self.push_level(level))
    }

    fn push_level(&mut self, level: CacheLevel) -> usize {
        tracing::info!(
            level = self.levels.len() + 1,
            capacity = level.capacity(),
            policy = %level.policy(),
            "added cache level"
        );
        self.levels.push(level);
        LEVELS_ADDED.increment();
        LEVELS.increment();
        self.levels.len() - 1
    }

    /// Remove the level at `index` (0-based), purging its keys from the
    /// ledger. Later levels shift down by one.
    pub fn remove_level(&mut self, index: usize) -> CacheResult<()> {
        if index >= self.levels.len() {
            return Err(CacheError::LevelOutOfRange {
                index,
                levels: self.levels.len(),
            });
        }

        let level = self.levels.remove(index);
        let purged = level.teardown(&mut self.ledger);
        tracing::info!(
            level = index + 1,
            entries = level.len(),
            purged,
            "removed cache level"
        );

        LEVELS_REMOVED.increment();
        LEVELS.decrement();
        Ok(())
    }

    /// Look up `key`, scanning levels in order.
    ///
    /// A hit is taken out of its level and re-inserted with [`put`](Self::put)
    /// semantics, so it lands in level 0 and may push other entries down. A
    /// miss changes nothing.
    pub fn get(&mut self, key: &str) -> Option<String> {
        GETS.increment();

        let hit = self
            .levels
            .iter_mut()
            .enumerate()
            .find_map(|(index, level)| level.get(key).map(|value| (index, value)));

        let Some((index, value)) = hit else {
            MISSES.increment();
            return None;
        };

        HITS.increment();
        if index > 0 {
            PROMOTIONS.increment();
        }
        tracing::debug!(key, level = index + 1, "hit, promoting to level 1");

        self.admit(key.to_string(), value.clone());
        Some(value)
    }

    /// Insert `key` into level 0, cascading displaced entries downward.
    ///
    /// Fails without side effects if no level has been added.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> CacheResult<PutOutcome> {
        if self.levels.is_empty() {
            PUT_ERRORS.increment();
            return Err(CacheError::NoLevels);
        }

        PUTS.increment();
        Ok(self.admit(key.into(), value.into()))
    }

    /// Evict one entry from the level at `index` and cascade it into the
    /// levels below. Returns `None` if the level is empty.
    pub fn evict(&mut self, index: usize) -> CacheResult<Option<Eviction>> {
        let levels = self.levels.len();
        let level = self
            .levels
            .get_mut(index)
            .ok_or(CacheError::LevelOutOfRange { index, levels })?;

        let Some(entry) = level.evict() else {
            return Ok(None);
        };

        tracing::debug!(key = %entry.key, level = index + 1, "evicted");
        let outcome = self.cascade(index + 1, entry.clone());
        Ok(Some(Eviction { entry, outcome }))
    }

    /// Snapshot every level. Never mutates.
    pub fn dump(&self) -> CacheDump {
        CacheDump {
            levels: self.levels.iter().map(CacheLevel::snapshot).collect(),
        }
    }

    /// Index of the level currently holding `key`.
    pub fn locate(&self, key: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(key))
    }

    /// The configured levels, fastest first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// The level at `index`, if any.
    pub fn level(&self, index: usize) -> Option<&CacheLevel> {
        self.levels.get(index)
    }

    /// Number of configured levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The cross-level frequency ledger.
    pub fn ledger(&self) -> &FrequencyLedger {
        &self.ledger
    }

    /// Record the insertion and push the entry through the hierarchy.
    ///
    /// Requires at least one level.
    fn admit(&mut self, key: String, value: String) -> PutOutcome {
        self.ledger.increment(&key);

        // level 0 resolves its own copy; any copy further down is stale
        for level in self.levels.iter_mut().skip(1) {
            level.discard(&key);
        }

        self.cascade(0, CacheEntry::new(key, value))
    }

    /// Offer `entry` to the level at `start`, then each displaced entry to
    /// the level after, until one is absorbed or the levels run out.
    fn cascade(&mut self, start: usize, entry: CacheEntry) -> PutOutcome {
        let mut carried = entry;

        for (index, level) in self.levels.iter_mut().enumerate().skip(start) {
            match level.put(carried.key, carried.value, &self.ledger) {
                None => return PutOutcome::Stored,
                Some(displaced) => {
                    tracing::debug!(
                        key = %displaced.key,
                        from = index + 1,
                        "cascading displaced entry"
                    );
                    CASCADES.increment();
                    carried = displaced;
                }
            }
        }

        tracing::warn!(key = %carried.key, "all cache storage is full, dropping entry");
        STORAGE_FULL.increment();
        PutOutcome::StorageFull(carried)
    }
}

impl Drop for MultiLevelCache {
    fn drop(&mut self) {
        for _ in &self.levels {
            LEVELS.decrement();
        }
    }
}

/// Snapshot of every level, fastest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDump {
    /// Per-level snapshots.
    pub levels: Vec<LevelSnapshot>,
}

impl CacheDump {
    /// Returns true if the cache had no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl fmt::Display for CacheDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.levels.is_empty() {
            return f.write_str("No cache found!");
        }
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "L{} Cache: {}", i + 1, level)?;
        }
        Ok(())
    }
}
