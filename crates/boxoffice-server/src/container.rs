//! Explicit construction of the application's services.
//!
//! Everything the process shares (the cache store, the cache-aside wrapper,
//! the invalidator, the per-event inventory locks and the services built on
//! them) is created once here and handed out as `Arc`s. There are no global
//! singletons.

use boxoffice_config::AppConfig;
use boxoffice_core::{BookingRepository, EventRepository, UserRepository};
use boxoffice_repository::{
    InMemoryBookingRepository, InMemoryEventRepository, InMemoryUserRepository,
};
use boxoffice_service::{
    BookingService, BookingServiceImpl, CacheAside, CacheInterface, CacheInvalidator,
    CacheStatsReport, EventService, EventServiceImpl, ExpirySweeper, InventoryLocks,
    MemoryCacheStore, SweepIntervals, SweeperHandle, UserService, UserServiceImpl,
};
use std::sync::Arc;
use tracing::info;

/// Storage adapters the services are built on.
pub struct Repositories {
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Process-local storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepository::new()),
            bookings: Arc::new(InMemoryBookingRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

/// Holds the shared cache services and the application services.
pub struct AppContainer {
    config: AppConfig,
    store: Arc<dyn CacheInterface>,
    cache: CacheAside,
    event_service: Arc<dyn EventService>,
    booking_service: Arc<dyn BookingService>,
    user_service: Arc<dyn UserService>,
}

impl AppContainer {
    /// Wires services over the given repositories.
    #[must_use]
    pub fn new(config: AppConfig, repositories: Repositories) -> Self {
        let store: Arc<dyn CacheInterface> = if config.cache.enabled {
            Arc::new(MemoryCacheStore::new())
        } else {
            Arc::new(MemoryCacheStore::disabled())
        };
        let cache = CacheAside::from_config(Arc::clone(&store), &config.cache);
        let invalidator = CacheInvalidator::new(Arc::clone(&store));
        let locks = InventoryLocks::new();

        let event_service: Arc<dyn EventService> = Arc::new(EventServiceImpl::new(
            Arc::clone(&repositories.events),
            cache.clone(),
            invalidator.clone(),
            locks.clone(),
        ));
        let booking_service: Arc<dyn BookingService> = Arc::new(BookingServiceImpl::new(
            repositories.bookings,
            repositories.events,
            cache.clone(),
            invalidator.clone(),
            locks,
        ));
        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            repositories.users,
            cache.clone(),
            invalidator,
        ));

        info!(cache_enabled = config.cache.enabled, "Application container built");

        Self {
            config,
            store,
            cache,
            event_service,
            booking_service,
            user_service,
        }
    }

    /// Wires services over process-local storage.
    #[must_use]
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Repositories::in_memory())
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn event_service(&self) -> Arc<dyn EventService> {
        Arc::clone(&self.event_service)
    }

    #[must_use]
    pub fn booking_service(&self) -> Arc<dyn BookingService> {
        Arc::clone(&self.booking_service)
    }

    #[must_use]
    pub fn user_service(&self) -> Arc<dyn UserService> {
        Arc::clone(&self.user_service)
    }

    /// Per-namespace cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStatsReport {
        self.cache.stats()
    }

    /// Starts the expiry sweeper. Returns `None` when caching is disabled,
    /// since nothing is ever stored.
    #[must_use]
    pub fn spawn_sweeper(&self) -> Option<SweeperHandle> {
        if !self.config.cache.enabled {
            info!("Cache disabled, expiry sweeper not started");
            return None;
        }
        let intervals = SweepIntervals::from(&self.config.cache);
        Some(ExpirySweeper::new(Arc::clone(&self.store), intervals).spawn())
    }
}

impl std::fmt::Debug for AppContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContainer")
            .field("cache_enabled", &self.config.cache.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::{DynamicPricing, UserId, UserRole};
    use boxoffice_service::{CreateEventRequest, Viewer};

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            name: "Open Mic".to_string(),
            description: "Bring a song".to_string(),
            date: "2099-03-03".to_string(),
            time: "18:30".to_string(),
            venue: "Back Room".to_string(),
            category: "comedy".to_string(),
            total_seats: 40,
            image_url: None,
            ticket_price: 12.5,
            dynamic_pricing: DynamicPricing::disabled(),
        }
    }

    #[tokio::test]
    async fn test_services_share_one_cache() {
        let container = AppContainer::in_memory(AppConfig::default());
        let organizer = Viewer::user(UserId::new(), UserRole::Organizer);
        let events = container.event_service();

        let created = events.create_event(&organizer, request()).await.unwrap();
        events.get_event(&organizer, created.id).await.unwrap();
        events.get_event(&organizer, created.id).await.unwrap();

        let stats = container.cache_stats();
        assert_eq!(stats.events.hits, 1);
        assert_eq!(stats.events.entries, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_has_no_sweeper() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        let container = AppContainer::in_memory(config);
        assert!(container.spawn_sweeper().is_none());
    }

    #[tokio::test]
    async fn test_sweeper_starts_and_stops() {
        let container = AppContainer::in_memory(AppConfig::default());
        let sweeper = container.spawn_sweeper().unwrap();
        assert!(sweeper.is_running());
        sweeper.shutdown().await;
    }
}
