//! In-memory event repository.

use super::MemoryTable;
use async_trait::async_trait;
use boxoffice_core::{
    BoxOfficeResult, Event, EventId, EventRepository, EventStatus, Repository, UserId,
};
use tracing::debug;

/// Event storage held in process memory.
pub struct InMemoryEventRepository {
    events: MemoryTable<EventId, Event>,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: MemoryTable::new("Event"),
        }
    }

    /// Creates a repository seeded with `events`.
    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let repo = Self::new();
        for event in events {
            // Seeds come from callers constructing fresh ids.
            let _ = repo.events.insert(&event);
        }
        repo
    }
}

fn newest_first(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events
}

#[async_trait]
impl Repository<Event, EventId> for InMemoryEventRepository {
    async fn find_by_id(&self, id: &EventId) -> BoxOfficeResult<Option<Event>> {
        Ok(self.events.get(id))
    }

    async fn save(&self, event: &Event) -> BoxOfficeResult<Event> {
        debug!(event_id = %event.id, "Saving event");
        self.events.insert(event)
    }

    async fn update(&self, event: &Event) -> BoxOfficeResult<Event> {
        self.events.replace(event)
    }

    async fn delete(&self, id: &EventId) -> BoxOfficeResult<bool> {
        Ok(self.events.remove(id))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_status(&self, status: EventStatus) -> BoxOfficeResult<Vec<Event>> {
        Ok(newest_first(self.events.filter(|e| e.status == status)))
    }

    async fn find_by_organizer(&self, organizer_id: &UserId) -> BoxOfficeResult<Vec<Event>> {
        Ok(newest_first(
            self.events.filter(|e| e.created_by == *organizer_id),
        ))
    }

    async fn find_all(&self) -> BoxOfficeResult<Vec<Event>> {
        Ok(newest_first(self.events.filter(|_| true)))
    }
}
