//! Cache-aside reads: look up, fall back to a loader on miss, populate.

use super::{CacheExt, CacheInterface, CacheKey, CacheMetrics, Namespace, NamespaceStats};
use boxoffice_config::CacheConfig;
use boxoffice_core::{BoxFuture, BoxOfficeError, BoxOfficeResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Default TTL for each namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceTtls {
    pub events: Duration,
    pub users: Duration,
    pub bookings: Duration,
}

impl NamespaceTtls {
    #[must_use]
    pub const fn get(&self, namespace: Namespace) -> Duration {
        match namespace {
            Namespace::Events => self.events,
            Namespace::Users => self.users,
            Namespace::Bookings => self.bookings,
        }
    }
}

impl Default for NamespaceTtls {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for NamespaceTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            events: config.events.ttl(),
            users: config.users.ttl(),
            bookings: config.bookings.ttl(),
        }
    }
}

/// Hit/miss counters for the cache-aside path. Informational only.
#[derive(Debug, Default)]
pub struct CacheAsideCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    loader_errors: AtomicU64,
    skipped_fills: AtomicU64,
}

impl CacheAsideCounters {
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn loader_errors(&self) -> u64 {
        self.loader_errors.load(Ordering::Relaxed)
    }

    /// Loads whose result was not cached because the key was invalidated
    /// while the loader ran.
    #[must_use]
    pub fn skipped_fills(&self) -> u64 {
        self.skipped_fills.load(Ordering::Relaxed)
    }
}

/// Stats for every namespace at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatsReport {
    pub events: NamespaceStats,
    pub users: NamespaceStats,
    pub bookings: NamespaceStats,
}

/// Cache-aside middleware over a [`CacheInterface`].
///
/// On a hit the cached value is returned and the loader is never invoked.
/// On a miss the loader runs once; its error is returned unchanged and
/// nothing is cached, otherwise the value is stored with the namespace's
/// default TTL (or an explicit override) and returned.
///
/// The fill is conditional on the key's write generation observed before the
/// loader started. If a writer invalidates the key while the loader runs, the
/// loaded value is still returned to this caller but never cached.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheInterface>,
    ttls: NamespaceTtls,
    enabled: bool,
    counters: Arc<CacheAsideCounters>,
}

impl CacheAside {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttls: NamespaceTtls) -> Self {
        let enabled = cache.is_enabled();
        Self {
            cache,
            ttls,
            enabled,
            counters: Arc::new(CacheAsideCounters::default()),
        }
    }

    /// Builds the middleware from configuration. `enabled = false` turns every
    /// read into a direct loader call.
    #[must_use]
    pub fn from_config(cache: Arc<dyn CacheInterface>, config: &CacheConfig) -> Self {
        let mut aside = Self::new(cache, NamespaceTtls::from(config));
        aside.enabled &= config.enabled;
        aside
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheInterface> {
        &self.cache
    }

    #[must_use]
    pub const fn default_ttl(&self, namespace: Namespace) -> Duration {
        self.ttls.get(namespace)
    }

    #[must_use]
    pub fn counters(&self) -> &CacheAsideCounters {
        &self.counters
    }

    /// Per-namespace store statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            events: self.cache.stats(Namespace::Events),
            users: self.cache.stats(Namespace::Users),
            bookings: self.cache.stats(Namespace::Bookings),
        }
    }

    /// Reads `key`, calling `loader` only on a miss.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Option<Duration>,
        loader: F,
    ) -> BoxOfficeResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = BoxOfficeResult<T>> + Send,
    {
        let namespace = key.namespace();

        let generation = if self.enabled {
            if let Some(cached) = self.cache.get::<T>(key).await? {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                CacheMetrics::hit(namespace);
                trace!(key = %key, "Cache hit");
                return Ok(cached);
            }
            Some(self.cache.generation(key))
        } else {
            None
        };

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        CacheMetrics::miss(namespace);
        trace!(key = %key, "Cache miss, invoking loader");

        let value = match loader().await {
            Ok(value) => value,
            Err(e) => {
                self.counters.loader_errors.fetch_add(1, Ordering::Relaxed);
                CacheMetrics::loader_error(namespace);
                return Err(e);
            }
        };

        if let Some(generation) = generation {
            let ttl = ttl.unwrap_or_else(|| self.ttls.get(namespace));
            if !self.cache.set_if(key, &value, ttl, generation).await? {
                self.counters.skipped_fills.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Key invalidated during load, result not cached");
            }
        }

        Ok(value)
    }

    /// Wraps a loader into a reusable cached read.
    ///
    /// `key_fn` must produce keys in `namespace`; a key routed elsewhere is
    /// rejected when the read is called. `ttl = None` uses the namespace
    /// default.
    pub fn wrap<P, T, K, L>(
        &self,
        namespace: Namespace,
        key_fn: K,
        loader: L,
        ttl: Option<Duration>,
    ) -> CachedRead<P, T>
    where
        K: Fn(&P) -> CacheKey + Send + Sync + 'static,
        L: Fn(P) -> BoxFuture<'static, T> + Send + Sync + 'static,
    {
        CachedRead {
            aside: self.clone(),
            namespace,
            key_fn: Arc::new(key_fn),
            loader: Arc::new(loader),
            ttl,
        }
    }
}

type KeyFn<P> = Arc<dyn Fn(&P) -> CacheKey + Send + Sync>;
type LoaderFn<P, T> = Arc<dyn Fn(P) -> BoxFuture<'static, T> + Send + Sync>;

/// A read operation wrapped with cache-aside behaviour.
pub struct CachedRead<P, T> {
    aside: CacheAside,
    namespace: Namespace,
    key_fn: KeyFn<P>,
    loader: LoaderFn<P, T>,
    ttl: Option<Duration>,
}

impl<P, T> Clone for CachedRead<P, T> {
    fn clone(&self) -> Self {
        Self {
            aside: self.aside.clone(),
            namespace: self.namespace,
            key_fn: Arc::clone(&self.key_fn),
            loader: Arc::clone(&self.loader),
            ttl: self.ttl,
        }
    }
}

impl<P, T> CachedRead<P, T>
where
    P: Send + 'static,
    T: Serialize + DeserializeOwned + Send + Sync,
{
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Runs the read for `params`.
    pub async fn call(&self, params: P) -> BoxOfficeResult<T> {
        let key = (self.key_fn)(&params);
        if key.namespace() != self.namespace {
            return Err(BoxOfficeError::internal(format!(
                "cache key {key} is routed to {} but the read is bound to {}",
                key.namespace(),
                self.namespace
            )));
        }

        let loader = Arc::clone(&self.loader);
        self.aside
            .fetch(&key, self.ttl, move || loader(params))
            .await
    }
}
