//! Caching infrastructure for the service layer.
//!
//! An in-process store partitioned by namespace, a key registry, mutation
//! driven invalidation, a cache-aside wrapper for reads and a background
//! expiry sweeper.

mod cache_aside;
mod cache_interface;
pub mod cache_keys;
mod invalidation;
mod memory_store;
pub mod metrics;
mod sweeper;

pub use cache_aside::{
    CacheAside, CacheAsideCounters, CacheStatsReport, CachedRead, NamespaceTtls,
};
pub use cache_interface::{CacheExt, CacheInterface, NamespaceStats};
pub use cache_keys::{CacheKey, EntityKind, Namespace};
pub use invalidation::{CacheInvalidator, InvalidationSet};
pub use memory_store::MemoryCacheStore;
pub use self::metrics::{register_metrics, CacheMetrics};
pub use sweeper::{ExpirySweeper, SweepIntervals, SweeperHandle};
