//! Least-frequently-used level storage.
//!
//! Each entry may carry a *local* frequency that is distinct from the
//! cross-level [`FrequencyLedger`]. Entries are scanned in level order,
//! which is insertion order kept in a `BTreeMap` keyed by a monotonic
//! position. Scan order is insertion order rather than hash order, so
//! eviction does not depend on the hasher seed.
//!
//! # Eviction scan
//!
//! When a full level receives a put, the threshold is seeded from the ledger
//! count of the *incoming* key (1 if the key was never recorded). The scan
//! then walks the level and accepts every counted entry whose local
//! frequency is at or below the running threshold, lowering the threshold as
//! it goes. Ties are accepted, so the last entry holding the minimum wins.
//! If nothing is at or below the seed, the incoming pair itself is displaced
//! and the level is left untouched, unless the level already holds the
//! incoming key, in which case that entry is overwritten in place.
//!
//! After the incoming entry is written, a level that ended up under capacity
//! takes the pulled candidate back and reports no displacement. This happens
//! when the put overwrote a key the level already held. Only the key and
//! value come back: the candidate's local frequency stays dropped, so it is
//! invisible to later scans until it is put again.

use crate::entry::CacheEntry;
use crate::ledger::FrequencyLedger;
use ahash::AHashMap;
use std::collections::BTreeMap;

struct Slot {
    value: String,
    /// `None` for an entry given back after a scan pulled it.
    frequency: Option<u64>,
    position: u64,
}

/// LFU storage for one level.
pub struct FrequencyLevel {
    capacity: usize,
    entries: AHashMap<String, Slot>,
    order: BTreeMap<u64, String>,
    next_position: u64,
}

impl FrequencyLevel {
    /// Create an empty level holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: AHashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            next_position: 0,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the level holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is stored in this level.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Local frequency of `key`, if stored and counted.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(|slot| slot.frequency)
    }

    /// Take the value for `key` out of the level, dropping its local
    /// frequency with it.
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.pull(key).map(|entry| entry.value)
    }

    /// Insert `key`, returning the displaced entry if any.
    pub fn put(
        &mut self,
        key: String,
        value: String,
        ledger: &FrequencyLedger,
    ) -> Option<CacheEntry> {
        let count = ledger.count(&key);

        let mut pulled = None;
        if self.len() >= self.capacity {
            let candidate = self.scan(count.unwrap_or(1));
            match candidate.and_then(|candidate| self.pull(&candidate)) {
                Some(candidate) => pulled = Some(candidate),
                // a key already held here is overwritten in place
                None if self.entries.contains_key(&key) => {}
                None => return Some(CacheEntry::new(key, value)),
            }
        }

        match self.entries.get_mut(&key) {
            Some(slot) => {
                slot.value = value;
                slot.frequency = Some(next_frequency(count, slot.frequency));
            }
            None => self.append(key.clone(), value, Some(next_frequency(count, None))),
        }

        let pulled = pulled?;

        // replaced by its own new value
        if pulled.key == key {
            return None;
        }

        if self.len() < self.capacity {
            self.append(pulled.key, pulled.value, None);
            return None;
        }

        Some(pulled)
    }

    /// Remove and return the counted entry with the lowest local frequency
    /// (the last one in level order on ties). A level holding only
    /// given-back entries gives up the first of them.
    pub fn evict(&mut self) -> Option<CacheEntry> {
        let candidate = self
            .scan(u64::MAX)
            .or_else(|| self.order.values().next().cloned())?;
        self.pull(&candidate)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// Iterate over `(key, value, local frequency)` in level order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Option<u64>)> {
        self.order.values().filter_map(|key| {
            self.entries
                .get(key)
                .map(|slot| (key.as_str(), slot.value.as_str(), slot.frequency))
        })
    }

    /// Iterate over stored keys in level order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.values().map(String::as_str)
    }

    /// Left-to-right scan accepting counted entries at or below the running
    /// threshold.
    fn scan(&self, seed: u64) -> Option<String> {
        let mut threshold = seed;
        let mut candidate = None;

        for key in self.order.values() {
            let Some(frequency) = self.entries.get(key).and_then(|slot| slot.frequency) else {
                continue;
            };
            if frequency <= threshold {
                threshold = frequency;
                candidate = Some(key);
            }
        }

        candidate.cloned()
    }

    fn append(&mut self, key: String, value: String, frequency: Option<u64>) {
        let position = self.next_position;
        self.next_position += 1;
        self.order.insert(position, key.clone());
        self.entries.insert(
            key,
            Slot {
                value,
                frequency,
                position,
            },
        );
    }

    fn pull(&mut self, key: &str) -> Option<CacheEntry> {
        let (key, slot) = self.entries.remove_entry(key)?;
        self.order.remove(&slot.position);
        Some(CacheEntry::new(key, slot.value))
    }
}

/// Local frequency after an insert: the ledger count when the key has been
/// put more than once, otherwise one more than the previous local count.
fn next_frequency(ledger_count: Option<u64>, local: Option<u64>) -> u64 {
    match ledger_count {
        Some(count) if count > 1 => count,
        _ => local.unwrap_or(0).saturating_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Record `key` in the ledger `times` times and put it into the level.
    fn put_with_count(
        level: &mut FrequencyLevel,
        ledger: &mut FrequencyLedger,
        key: &str,
        value: &str,
        times: u64,
    ) -> Option<CacheEntry> {
        for _ in 0..times {
            ledger.increment(key);
        }
        level.put(key.to_string(), value.to_string(), ledger)
    }

    fn contents(level: &FrequencyLevel) -> Vec<(&str, &str, Option<u64>)> {
        level.iter().collect()
    }

    #[test]
    fn test_put_below_capacity() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();

        assert!(put_with_count(&mut level, &mut ledger, "x", "10", 1).is_none());
        assert!(put_with_count(&mut level, &mut ledger, "y", "20", 1).is_none());
        assert_eq!(contents(&level), vec![("x", "10", Some(1)), ("y", "20", Some(1))]);
    }

    #[test]
    fn test_get_removes_value_and_frequency() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "x", "10", 1);
        put_with_count(&mut level, &mut ledger, "y", "20", 1);

        assert_eq!(level.get("x"), Some("10".to_string()));
        assert_eq!(level.frequency("x"), None);
        assert_eq!(contents(&level), vec![("y", "20", Some(1))]);
        assert_eq!(level.get("x"), None);
    }

    #[test]
    fn test_local_frequency_copies_ledger_above_one() {
        let mut level = FrequencyLevel::new(4);
        let mut ledger = FrequencyLedger::new();

        put_with_count(&mut level, &mut ledger, "a", "1", 5);
        assert_eq!(level.frequency("a"), Some(5));
    }

    #[test]
    fn test_local_frequency_increments_at_ledger_one() {
        let mut level = FrequencyLevel::new(4);
        let mut ledger = FrequencyLedger::new();
        ledger.increment("a");

        level.put("a".to_string(), "1".to_string(), &ledger);
        level.put("a".to_string(), "2".to_string(), &ledger);
        assert_eq!(level.frequency("a"), Some(2));
        assert_eq!(contents(&level), vec![("a", "2", Some(2))]);
    }

    #[test]
    fn test_unrecorded_key_counts_as_one() {
        let mut level = FrequencyLevel::new(1);
        let ledger = FrequencyLedger::new();

        level.put("a".to_string(), "1".to_string(), &ledger);
        assert_eq!(level.frequency("a"), Some(1));

        // seed defaults to 1, so "a" (frequency 1) is a candidate
        let displaced = level.put("b".to_string(), "2".to_string(), &ledger);
        assert_eq!(displaced, Some(CacheEntry::new("a", "1")));
        assert_eq!(contents(&level), vec![("b", "2", Some(1))]);
    }

    #[test]
    fn test_scan_accepts_ties_last_wins() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 1);

        let displaced = put_with_count(&mut level, &mut ledger, "c", "3", 1);
        assert_eq!(displaced, Some(CacheEntry::new("b", "2")));
        assert_eq!(contents(&level), vec![("a", "1", Some(1)), ("c", "3", Some(1))]);
    }

    #[test]
    fn test_scan_lowers_threshold() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 2);

        // seed 3: "a" (1) is accepted, then "b" (2) is above the lowered threshold
        let displaced = put_with_count(&mut level, &mut ledger, "c", "3", 3);
        assert_eq!(displaced, Some(CacheEntry::new("a", "1")));
        assert_eq!(contents(&level), vec![("b", "2", Some(2)), ("c", "3", Some(3))]);
    }

    #[test]
    fn test_no_candidate_displaces_incoming() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 3);
        put_with_count(&mut level, &mut ledger, "b", "2", 3);

        let displaced = put_with_count(&mut level, &mut ledger, "c", "3", 1);
        assert_eq!(displaced, Some(CacheEntry::new("c", "3")));
        assert_eq!(contents(&level), vec![("a", "1", Some(3)), ("b", "2", Some(3))]);
    }

    #[test]
    fn test_no_candidate_overwrites_held_key_in_place() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 3);
        put_with_count(&mut level, &mut ledger, "b", "2", 3);

        // the ledger forgot "a" (its count restarts at 1), so nothing is at
        // or below the seed
        ledger.remove("a");
        let displaced = put_with_count(&mut level, &mut ledger, "a", "10", 1);
        assert!(displaced.is_none());
        assert_eq!(contents(&level), vec![("a", "10", Some(4)), ("b", "2", Some(3))]);
    }

    #[test]
    fn test_overwrite_at_capacity_gives_candidate_back() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 1);

        // "b" is pulled by the scan, "a" is overwritten, then "b" comes back
        // without its counter
        let displaced = put_with_count(&mut level, &mut ledger, "a", "10", 1);
        assert!(displaced.is_none());
        assert_eq!(contents(&level), vec![("a", "10", Some(2)), ("b", "2", None)]);
        assert_eq!(level.frequency("b"), None);
        assert!(level.contains("b"));
    }

    #[test]
    fn test_given_back_entry_is_skipped_by_scan() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 1);
        put_with_count(&mut level, &mut ledger, "a", "1", 1);

        // "a" (2) is above the seed and "b" has no counter, so "c" is refused
        let displaced = put_with_count(&mut level, &mut ledger, "c", "3", 1);
        assert_eq!(displaced, Some(CacheEntry::new("c", "3")));
        assert_eq!(contents(&level), vec![("a", "1", Some(2)), ("b", "2", None)]);
    }

    #[test]
    fn test_given_back_entry_counts_again_once_put() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 1);
        put_with_count(&mut level, &mut ledger, "a", "1", 1);

        // "b" (ledger 2) pulls "a" (2), is overwritten in place, and "a"
        // comes back uncounted
        let displaced = put_with_count(&mut level, &mut ledger, "b", "20", 1);
        assert!(displaced.is_none());
        assert_eq!(level.frequency("b"), Some(2));
        assert_eq!(level.frequency("a"), None);
        assert_eq!(level.len(), 2);
    }

    #[test]
    fn test_evict_falls_back_to_given_back_entries() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 1);
        put_with_count(&mut level, &mut ledger, "a", "10", 1);

        assert_eq!(level.evict(), Some(CacheEntry::new("a", "10")));
        assert_eq!(level.evict(), Some(CacheEntry::new("b", "2")));
        assert_eq!(level.evict(), None);
    }

    #[test]
    fn test_incoming_key_as_candidate_is_superseded() {
        let mut level = FrequencyLevel::new(2);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 1);
        put_with_count(&mut level, &mut ledger, "b", "2", 2);

        // "a" is the only candidate; its old value must not come back
        let displaced = put_with_count(&mut level, &mut ledger, "a", "10", 1);
        assert!(displaced.is_none());
        assert_eq!(contents(&level), vec![("b", "2", Some(2)), ("a", "10", Some(2))]);
    }

    #[test]
    fn test_evict_picks_lowest_frequency() {
        let mut level = FrequencyLevel::new(3);
        let mut ledger = FrequencyLedger::new();
        put_with_count(&mut level, &mut ledger, "a", "1", 3);
        put_with_count(&mut level, &mut ledger, "b", "2", 2);
        put_with_count(&mut level, &mut ledger, "c", "3", 4);

        assert_eq!(level.evict(), Some(CacheEntry::new("b", "2")));
        assert_eq!(level.evict(), Some(CacheEntry::new("a", "1")));
        assert_eq!(level.evict(), Some(CacheEntry::new("c", "3")));
        assert_eq!(level.evict(), None);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut level = FrequencyLevel::new(3);
        let mut ledger = FrequencyLedger::new();

        for i in 0..50u64 {
            let key = format!("k{}", i % 7);
            put_with_count(&mut level, &mut ledger, &key, "v", 1 + i % 3);
            assert!(level.len() <= level.capacity());
        }
    }
}
