//! Prometheus metrics for the cache layer.
//!
//! Recording goes through the `metrics` facade; with no recorder installed
//! every call is a no-op.

use super::{Namespace, NamespaceStats};
use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the cache.
pub mod names {
    /// Cache-aside reads served from the store.
    pub const CACHE_HITS_TOTAL: &str = "boxoffice_cache_hits_total";
    /// Cache-aside reads that fell through to the loader.
    pub const CACHE_MISSES_TOTAL: &str = "boxoffice_cache_misses_total";
    /// Loader failures surfaced through the cache-aside path.
    pub const CACHE_LOADER_ERRORS_TOTAL: &str = "boxoffice_cache_loader_errors_total";
    /// Keys deleted by mutation-driven invalidation.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "boxoffice_cache_invalidations_total";
    /// Entries dropped because their TTL elapsed.
    pub const CACHE_EXPIRED_TOTAL: &str = "boxoffice_cache_expired_total";

    /// Hit ratio per namespace.
    pub const CACHE_HIT_RATIO: &str = "boxoffice_cache_hit_ratio";
    /// Entries currently held per namespace.
    pub const CACHE_ENTRIES: &str = "boxoffice_cache_entries";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of cache-aside reads served from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of cache-aside reads that invoked the loader"
    );
    describe_counter!(
        names::CACHE_LOADER_ERRORS_TOTAL,
        "Total number of loader failures on the cache-aside path"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of keys deleted by invalidation"
    );
    describe_counter!(
        names::CACHE_EXPIRED_TOTAL,
        "Total number of entries removed after their TTL elapsed"
    );

    describe_gauge!(names::CACHE_HIT_RATIO, "Cache hit ratio per namespace");
    describe_gauge!(names::CACHE_ENTRIES, "Current number of cached entries");
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache-aside hit.
    pub fn hit(namespace: Namespace) {
        counter!(names::CACHE_HITS_TOTAL, "namespace" => namespace.as_str()).increment(1);
    }

    /// Record a cache-aside miss.
    pub fn miss(namespace: Namespace) {
        counter!(names::CACHE_MISSES_TOTAL, "namespace" => namespace.as_str()).increment(1);
    }

    /// Record a loader failure.
    pub fn loader_error(namespace: Namespace) {
        counter!(names::CACHE_LOADER_ERRORS_TOTAL, "namespace" => namespace.as_str())
            .increment(1);
    }

    /// Record keys removed by invalidation.
    pub fn invalidated(namespace: Namespace, count: u64) {
        counter!(names::CACHE_INVALIDATIONS_TOTAL, "namespace" => namespace.as_str())
            .increment(count);
    }

    /// Record entries removed after expiry.
    pub fn expired(namespace: Namespace, count: u64) {
        if count > 0 {
            counter!(names::CACHE_EXPIRED_TOTAL, "namespace" => namespace.as_str())
                .increment(count);
        }
    }

    /// Publish the gauges derived from a stats snapshot.
    pub fn snapshot(namespace: Namespace, stats: &NamespaceStats) {
        gauge!(names::CACHE_HIT_RATIO, "namespace" => namespace.as_str()).set(stats.hit_ratio());
        gauge!(names::CACHE_ENTRIES, "namespace" => namespace.as_str()).set(stats.entries as f64);
    }
}
