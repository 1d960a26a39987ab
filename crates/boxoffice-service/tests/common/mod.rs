//! Shared harness for the service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use boxoffice_core::{
    BoxOfficeResult, DynamicPricing, Event, EventId, EventRepository, EventStatus, NewEvent,
    PricingRule, Repository, UserId,
};
use boxoffice_repository::{InMemoryBookingRepository, InMemoryEventRepository};
use boxoffice_service::{
    BookingServiceImpl, CacheAside, CacheInterface, CacheInvalidator, EventServiceImpl,
    InventoryLocks, MemoryCacheStore, NamespaceTtls,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Holds one lookup after it has read its row, until released.
#[derive(Default)]
pub struct LookupGate {
    reached: Notify,
    release: Notify,
}

impl LookupGate {
    /// Resolves once the gated lookup has read its row.
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    /// Lets the gated lookup return.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Event storage that counts single-event lookups, standing in for the
/// loader the cache is supposed to spare. A lookup can be paused after it
/// has read the row to widen race windows deterministically.
#[derive(Default)]
pub struct CountingEventRepository {
    inner: InMemoryEventRepository,
    lookups: AtomicUsize,
    gate: Mutex<Option<Arc<LookupGate>>>,
}

impl CountingEventRepository {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Pauses the next `find_by_id` after it reads its row.
    pub fn pause_next_lookup(&self) -> Arc<LookupGate> {
        let gate = Arc::new(LookupGate::default());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl Repository<Event, EventId> for CountingEventRepository {
    async fn find_by_id(&self, id: &EventId) -> BoxOfficeResult<Option<Event>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let row = self.inner.find_by_id(id).await;
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        row
    }

    async fn save(&self, entity: &Event) -> BoxOfficeResult<Event> {
        self.inner.save(entity).await
    }

    async fn update(&self, entity: &Event) -> BoxOfficeResult<Event> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &EventId) -> BoxOfficeResult<bool> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl EventRepository for CountingEventRepository {
    async fn find_by_status(&self, status: EventStatus) -> BoxOfficeResult<Vec<Event>> {
        self.inner.find_by_status(status).await
    }

    async fn find_by_organizer(&self, organizer_id: &UserId) -> BoxOfficeResult<Vec<Event>> {
        self.inner.find_by_organizer(organizer_id).await
    }

    async fn find_all(&self) -> BoxOfficeResult<Vec<Event>> {
        self.inner.find_all().await
    }
}

/// Event and booking services sharing one store and one event table.
pub struct Harness {
    pub store: Arc<MemoryCacheStore>,
    pub events: Arc<CountingEventRepository>,
    pub event_service: EventServiceImpl,
    pub booking_service: BookingServiceImpl,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_aside(|cache| CacheAside::new(cache, NamespaceTtls::default()))
    }

    pub fn with_aside(build: impl Fn(Arc<dyn CacheInterface>) -> CacheAside) -> Self {
        let store = Arc::new(MemoryCacheStore::new());
        let cache: Arc<dyn CacheInterface> = store.clone();
        let events = Arc::new(CountingEventRepository::default());
        let aside = build(Arc::clone(&cache));
        let invalidator = CacheInvalidator::new(cache);
        let locks = InventoryLocks::new();

        let event_service = EventServiceImpl::new(
            events.clone(),
            aside.clone(),
            invalidator.clone(),
            locks.clone(),
        );
        let booking_service = BookingServiceImpl::new(
            Arc::new(InMemoryBookingRepository::new()),
            events.clone(),
            aside,
            invalidator,
            locks,
        );

        Self {
            store,
            events,
            event_service,
            booking_service,
        }
    }

    /// Stores an approved 100-seat event priced at 100 with the surge
    /// schedule `[≤10 seats: +10%, ≤5 seats: +20%]`.
    pub async fn seed_event(&self, sold_tickets: u32) -> Event {
        self.seed_event_with_rules(
            sold_tickets,
            vec![PricingRule::new(10, 10.0), PricingRule::new(5, 20.0)],
        )
        .await
    }

    /// Stores an approved 100-seat event priced at 100 with `rules`.
    pub async fn seed_event_with_rules(&self, sold_tickets: u32, rules: Vec<PricingRule>) -> Event {
        let mut event = Event::new(
            NewEvent {
                name: "Harbour Lights".to_string(),
                description: "Open air concert".to_string(),
                date: "2099-08-14".to_string(),
                time: "19:30".to_string(),
                venue: "Pier 4".to_string(),
                category: "music".to_string(),
                total_seats: 100,
                image_url: None,
                ticket_price: 100.0,
                dynamic_pricing: DynamicPricing::with_rules(rules),
            },
            UserId::new(),
        )
        .unwrap();
        event.sold_tickets = sold_tickets;
        event.change_status(EventStatus::Approved);
        self.events.save(&event).await.unwrap()
    }
}
