//! Cache interface trait for abstracted caching operations.

use super::{CacheKey, Namespace};
use async_trait::async_trait;
use boxoffice_core::BoxOfficeResult;
use serde::Serialize;
use std::time::Duration;

/// Point-in-time counters for one namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    /// Entries dropped because their TTL elapsed, lazily or by the sweeper.
    pub expired: u64,
    /// Entries currently held, including expired ones not yet purged.
    pub entries: usize,
}

impl NamespaceStats {
    /// Hits over total lookups, or zero before the first lookup.
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Cache interface for storing and retrieving cached data.
///
/// Values are JSON strings so the trait stays object safe; [`CacheExt`]
/// layers typed access on top. Every operation is routed by the namespace
/// carried in the [`CacheKey`].
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key was never set, was deleted, or has expired.
    async fn get_raw(&self, key: &CacheKey) -> BoxOfficeResult<Option<String>>;

    /// Set a raw JSON value with a TTL. A zero TTL is rejected.
    async fn set_raw(&self, key: &CacheKey, value: &str, ttl: Duration) -> BoxOfficeResult<()>;

    /// Set a raw JSON value only if `key` has not been deleted since
    /// [`generation`](Self::generation) returned `generation`.
    ///
    /// Returns `false` when the write was skipped.
    async fn set_raw_if(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Duration,
        generation: u64,
    ) -> BoxOfficeResult<bool>;

    /// Write generation of `key`. Advanced by every delete of the key and by
    /// a flush of its namespace.
    fn generation(&self, key: &CacheKey) -> u64;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed. Deleting an absent key is not an error.
    async fn delete(&self, key: &CacheKey) -> BoxOfficeResult<bool>;

    /// Check if a live (unexpired) key exists.
    async fn exists(&self, key: &CacheKey) -> BoxOfficeResult<bool>;

    /// Remove every entry in a namespace. Returns the number removed.
    async fn flush(&self, namespace: Namespace) -> BoxOfficeResult<u64>;

    /// Remove entries in a namespace whose TTL has elapsed.
    async fn purge_expired(&self, namespace: Namespace) -> BoxOfficeResult<u64>;

    /// Counters for a namespace.
    fn stats(&self, namespace: Namespace) -> NamespaceStats;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &CacheKey,
    ) -> BoxOfficeResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> BoxOfficeResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Set a typed value unless `key` was deleted after `generation` was read.
    async fn set_if<T: serde::Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
        generation: u64,
    ) -> BoxOfficeResult<bool> {
        let json = serde_json::to_string(value)?;
        self.set_raw_if(key, &json, ttl, generation).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
