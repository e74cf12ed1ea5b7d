//! Tiered cache metrics.

use metriken::{Counter, Gauge, metric};

// Lookups
#[metric(name = "tiered_cache_gets", description = "Total GET operations")]
pub static GETS: Counter = Counter::new();

#[metric(name = "tiered_cache_hits", description = "Total cache hits")]
pub static HITS: Counter = Counter::new();

#[metric(name = "tiered_cache_misses", description = "Total cache misses")]
pub static MISSES: Counter = Counter::new();

// Insertions
#[metric(name = "tiered_cache_puts", description = "Total PUT operations")]
pub static PUTS: Counter = Counter::new();

#[metric(
    name = "tiered_cache_put_errors",
    description = "PUT operations rejected because no level is configured"
)]
pub static PUT_ERRORS: Counter = Counter::new();

#[metric(
    name = "tiered_cache_promotions",
    description = "Hits below level 1 promoted back into level 1"
)]
pub static PROMOTIONS: Counter = Counter::new();

#[metric(
    name = "tiered_cache_cascades",
    description = "Displaced entries re-offered to the next level"
)]
pub static CASCADES: Counter = Counter::new();

#[metric(
    name = "tiered_cache_storage_full",
    description = "Entries dropped off the last level"
)]
pub static STORAGE_FULL: Counter = Counter::new();

// Topology
// Process-wide: sums the levels of every live cache.
#[metric(
    name = "tiered_cache_levels",
    description = "Levels held by live caches in this process"
)]
pub static LEVELS: Gauge = Gauge::new();

#[metric(name = "tiered_cache_levels_added", description = "Levels added")]
pub static LEVELS_ADDED: Counter = Counter::new();

#[metric(name = "tiered_cache_levels_removed", description = "Levels removed")]
pub static LEVELS_REMOVED: Counter = Counter::new();
