//! Event service implementation.

use super::{require_admin, require_self_or_admin, require_user};
use crate::cache::cache_keys::{self, views};
use crate::cache::{CacheAside, CacheInvalidator, CachedRead, EntityKind, Namespace};
use crate::dto::{
    CreateEventRequest, EventQuery, EventResponse, UpdateEventRequest, UpdateEventStatusRequest,
    Viewer,
};
use crate::event_service::EventService;
use crate::inventory::InventoryLocks;
use async_trait::async_trait;
use boxoffice_core::{
    BoxFuture, BoxOfficeError, BoxOfficeResult, Event, EventId, EventRepository, EventStatus,
    Repository, UserId, UserRole, ValidateExt,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Event service backed by an [`EventRepository`] and the events namespace.
///
/// Row rewrites take the event's [`InventoryLocks`] entry, the same one the
/// booking service holds while recording a sale.
pub struct EventServiceImpl {
    events: Arc<dyn EventRepository>,
    cache: CacheAside,
    invalidator: CacheInvalidator,
    locks: InventoryLocks,
    by_id: CachedRead<EventId, Event>,
}

impl EventServiceImpl {
    /// Creates a new event service.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        cache: CacheAside,
        invalidator: CacheInvalidator,
        locks: InventoryLocks,
    ) -> Self {
        let repository = Arc::clone(&events);
        let by_id = cache.wrap(
            Namespace::Events,
            |id: &EventId| cache_keys::by_id(EntityKind::Event, id),
            move |id: EventId| -> BoxFuture<'static, Event> {
                let repository = Arc::clone(&repository);
                Box::pin(async move {
                    repository
                        .find_by_id(&id)
                        .await?
                        .ok_or_else(|| BoxOfficeError::not_found("Event", id))
                })
            },
            None,
        );

        Self {
            events,
            cache,
            invalidator,
            locks,
            by_id,
        }
    }

    /// Loads straight from storage. Mutations never start from a cached copy.
    async fn load(&self, id: EventId) -> BoxOfficeResult<Event> {
        self.events
            .find_by_id(&id)
            .await?
            .ok_or_else(|| BoxOfficeError::not_found("Event", id))
    }

    async fn load_managed(&self, viewer: &Viewer, id: EventId) -> BoxOfficeResult<Event> {
        let event = self.load(id).await?;
        if !viewer.can_manage(&event) {
            return Err(BoxOfficeError::forbidden(format!(
                "event {id} belongs to another organizer"
            )));
        }
        Ok(event)
    }
}

#[async_trait]
impl EventService for EventServiceImpl {
    async fn create_event(
        &self,
        viewer: &Viewer,
        request: CreateEventRequest,
    ) -> BoxOfficeResult<EventResponse> {
        let organizer = require_user(viewer)?;
        if !matches!(viewer.role, UserRole::Organizer | UserRole::Admin) {
            return Err(BoxOfficeError::forbidden("only organizers may create events"));
        }
        debug!("Creating event: {}", request.name);
        request.validate_request()?;

        let event = Event::new(request.into(), organizer)?;
        let saved = self.events.save(&event).await?;
        self.invalidator
            .on_event_mutation(saved.id, saved.created_by)
            .await?;

        info!(event_id = %saved.id, organizer = %organizer, "Event created");
        EventResponse::for_viewer(&saved, viewer)
    }

    async fn update_event(
        &self,
        viewer: &Viewer,
        id: EventId,
        request: UpdateEventRequest,
    ) -> BoxOfficeResult<EventResponse> {
        debug!("Updating event: {}", id);
        request.validate_request()?;

        let _inventory = self.locks.lock(id).await;
        let mut event = self.load_managed(viewer, id).await?;

        if let Some(name) = request.name {
            event.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(date) = request.date {
            event.date = date;
        }
        if let Some(time) = request.time {
            event.time = time;
        }
        if let Some(venue) = request.venue {
            event.venue = venue;
        }
        if let Some(category) = request.category {
            event.category = category;
        }
        if let Some(image_url) = request.image_url {
            event.image_url = Some(image_url);
        }
        if let Some(total_seats) = request.total_seats {
            if total_seats < event.sold_tickets {
                return Err(BoxOfficeError::validation(format!(
                    "total_seats cannot drop below the {} tickets already sold",
                    event.sold_tickets
                )));
            }
            event.total_seats = total_seats;
        }
        if let Some(ticket_price) = request.ticket_price {
            event.set_ticket_price(ticket_price)?;
        }
        if let Some(pricing) = request.dynamic_pricing {
            event.set_dynamic_pricing(pricing)?;
        }
        event.updated_at = Utc::now();

        let updated = self.events.update(&event).await?;
        self.invalidator
            .on_event_mutation(updated.id, updated.created_by)
            .await?;

        info!(event_id = %id, "Event updated");
        EventResponse::for_viewer(&updated, viewer)
    }

    async fn update_status(
        &self,
        viewer: &Viewer,
        id: EventId,
        request: UpdateEventStatusRequest,
    ) -> BoxOfficeResult<EventResponse> {
        require_admin(viewer, "moderate events")?;
        debug!("Updating event status: {} -> {}", id, request.status);

        let _inventory = self.locks.lock(id).await;
        let mut event = self.load(id).await?;
        event.change_status(request.status);
        let updated = self.events.update(&event).await?;
        self.invalidator
            .on_event_mutation(updated.id, updated.created_by)
            .await?;

        info!(event_id = %id, status = %request.status, "Event status updated");
        EventResponse::for_viewer(&updated, viewer)
    }

    async fn delete_event(&self, viewer: &Viewer, id: EventId) -> BoxOfficeResult<()> {
        debug!("Deleting event: {}", id);
        let inventory = self.locks.lock(id).await;
        let event = self.load_managed(viewer, id).await?;

        if !self.events.delete(&id).await? {
            return Err(BoxOfficeError::not_found("Event", id));
        }
        drop(inventory);
        self.locks.forget(id);
        self.invalidator
            .on_event_mutation(id, event.created_by)
            .await?;

        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    async fn get_event(&self, viewer: &Viewer, id: EventId) -> BoxOfficeResult<EventResponse> {
        let event = self.by_id.call(id).await?;
        EventResponse::for_viewer(&event, viewer)
    }

    async fn list_approved(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<EventResponse>> {
        let key = cache_keys::list_view(EntityKind::Event, views::APPROVED);
        let events = Arc::clone(&self.events);
        let upcoming: Vec<Event> = self
            .cache
            .fetch(&key, None, move || async move {
                let today = Utc::now().date_naive();
                let mut approved = events.find_by_status(EventStatus::Approved).await?;
                approved.retain(|event| is_upcoming(event, today));
                sort_by_schedule(&mut approved);
                Ok(approved)
            })
            .await?;

        EventResponse::list_for_viewer(&upcoming, viewer)
    }

    async fn list_pending(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<EventResponse>> {
        require_admin(viewer, "review pending events")?;
        let key = cache_keys::list_view(EntityKind::Event, views::PENDING);
        let events = Arc::clone(&self.events);
        let pending: Vec<Event> = self
            .cache
            .fetch(&key, None, move || async move {
                let mut pending = events.find_by_status(EventStatus::Pending).await?;
                sort_by_schedule(&mut pending);
                Ok(pending)
            })
            .await?;

        EventResponse::list_for_viewer(&pending, viewer)
    }

    async fn list_by_organizer(
        &self,
        viewer: &Viewer,
        organizer_id: UserId,
    ) -> BoxOfficeResult<Vec<EventResponse>> {
        require_self_or_admin(viewer, organizer_id)?;
        let key = cache_keys::by_owner(EntityKind::Event, organizer_id);
        let events = Arc::clone(&self.events);
        let owned: Vec<Event> = self
            .cache
            .fetch(&key, None, move || async move {
                let mut owned = events.find_by_organizer(&organizer_id).await?;
                sort_by_schedule(&mut owned);
                Ok(owned)
            })
            .await?;

        EventResponse::list_for_viewer(&owned, viewer)
    }

    async fn search_events(
        &self,
        viewer: &Viewer,
        query: EventQuery,
    ) -> BoxOfficeResult<Vec<EventResponse>> {
        require_admin(viewer, "search all events")?;
        let mut matching: Vec<Event> = self
            .events
            .find_all()
            .await?
            .into_iter()
            .filter(|event| query.matches(event))
            .collect();
        sort_by_schedule(&mut matching);

        EventResponse::list_for_viewer(&matching, viewer)
    }
}

/// Events dated strictly after `today`. Unparseable dates are not listed.
fn is_upcoming(event: &Event, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(&event.date, "%Y-%m-%d").is_ok_and(|date| date > today)
}

fn sort_by_schedule(events: &mut [Event]) {
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
}

impl std::fmt::Debug for EventServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventServiceImpl").finish_non_exhaustive()
    }
}
