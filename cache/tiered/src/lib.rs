//! tiered-cache: a multi-level in-memory key/value cache.
//!
//! This crate provides the building blocks for a hierarchy of small,
//! capacity-bounded string caches:
//!
//! - **Configuration**: `EvictionPolicy`, `LevelConfig`
//! - **Levels**: `CacheLevel` wrapping LRU (`RecencyLevel`) or LFU (`FrequencyLevel`) storage
//! - **Ledger**: `FrequencyLedger`, the cross-level put counter that seeds LFU decisions
//! - **Cache**: `MultiLevelCache` orchestrating the levels
//!
//! # Architecture
//!
//! ```text
//!                 +---------------------------+
//!                 |      FrequencyLedger      |
//!                 |  (key -> lifetime puts)   |
//!                 +---------------------------+
//!                              |
//!                              v
//!    put / promote     +---------------+
//!   ---------------->  |    Level 1    |
//!                      |  (LRU / LFU)  |
//!                      +-------+-------+
//!                              | displaced
//!                              v
//!                      +---------------+
//!                      |    Level 2    |
//!                      |  (LRU / LFU)  |
//!                      +-------+-------+
//!                              | displaced
//!                              v
//!                         storage full
//! ```
//!
//! # Example
//!
//! ```
//! use tiered_cache::{EvictionPolicy, MultiLevelCache, PutOutcome};
//!
//! let mut cache = MultiLevelCache::new();
//! cache.add_level(2, EvictionPolicy::Recency).unwrap();
//! cache.add_level(4, EvictionPolicy::Frequency).unwrap();
//!
//! assert_eq!(cache.put("a", "1").unwrap(), PutOutcome::Stored);
//! assert_eq!(cache.get("a").as_deref(), Some("1"));
//! assert_eq!(cache.get("missing"), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod config;
mod entry;
mod error;
mod ledger;
mod level;

pub mod metrics;

pub use cache::{CacheDump, Eviction, MultiLevelCache, PutOutcome};
pub use config::{EvictionPolicy, LevelConfig};
pub use entry::CacheEntry;
pub use error::{CacheError, CacheResult, ErrorKind};
pub use ledger::FrequencyLedger;
pub use level::{CacheLevel, FrequencyLevel, LevelSnapshot, RecencyLevel, SnapshotEntry};
