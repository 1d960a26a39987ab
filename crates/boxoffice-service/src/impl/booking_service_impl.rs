//! Booking service implementation.

use super::{require_self_or_admin, require_user};
use crate::booking_service::BookingService;
use crate::cache::{cache_keys, CacheAside, CacheInvalidator};
use crate::dto::{BookingResponse, CreateBookingRequest, SeatMap, Viewer};
use crate::inventory::InventoryLocks;
use crate::pricing;
use async_trait::async_trait;
use boxoffice_core::{
    Booking, BookingId, BookingRepository, BoxOfficeError, BoxOfficeResult, Event, EventId,
    EventRepository, EventStatus, Repository, UserId, ValidateExt,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Booking service. Every sale or release rewrites the event's inventory, so
/// each mutation clears both the booking keys and the event keys.
pub struct BookingServiceImpl {
    bookings: Arc<dyn BookingRepository>,
    events: Arc<dyn EventRepository>,
    cache: CacheAside,
    invalidator: CacheInvalidator,
    /// Serializes event row rewrites with the event service.
    locks: InventoryLocks,
}

impl BookingServiceImpl {
    /// Creates a new booking service.
    #[must_use]
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        events: Arc<dyn EventRepository>,
        cache: CacheAside,
        invalidator: CacheInvalidator,
        locks: InventoryLocks,
    ) -> Self {
        Self {
            bookings,
            events,
            cache,
            invalidator,
            locks,
        }
    }

    async fn load_event(&self, id: EventId) -> BoxOfficeResult<Event> {
        self.events
            .find_by_id(&id)
            .await?
            .ok_or_else(|| BoxOfficeError::not_found("Event", id))
    }

    async fn load_booking(&self, id: BookingId) -> BoxOfficeResult<Booking> {
        self.bookings
            .find_by_id(&id)
            .await?
            .ok_or_else(|| BoxOfficeError::not_found("Booking", id))
    }

    /// Applies `transition` to a booking the viewer owns, releases the seat
    /// and clears every key that depended on either record.
    ///
    /// If the inventory write fails the booking is put back the way it was.
    async fn release(
        &self,
        viewer: &Viewer,
        id: BookingId,
        transition: fn(&mut Booking) -> BoxOfficeResult<()>,
    ) -> BoxOfficeResult<BookingResponse> {
        let event_id = self.load_booking(id).await?.event_id;
        let _inventory = self.locks.lock(event_id).await;

        let original = self.load_booking(id).await?;
        require_self_or_admin(viewer, original.user_id)?;
        let mut booking = original.clone();
        transition(&mut booking)?;

        let mut event = self.load_event(booking.event_id).await?;
        event.release_sale();

        let updated = self.bookings.update(&booking).await?;
        if let Err(e) = self.events.update(&event).await {
            warn!(booking_id = %id, error = %e, "Inventory update failed, restoring booking");
            let restored = self.bookings.update(&original).await;
            self.invalidator
                .on_booking_mutation(original.event_id, original.user_id)
                .await?;
            restored?;
            return Err(e);
        }

        self.invalidator
            .on_event_mutation(event.id, event.created_by)
            .await?;
        self.invalidator
            .on_booking_mutation(updated.event_id, updated.user_id)
            .await?;

        info!(
            booking_id = %id,
            event_id = %updated.event_id,
            status = %updated.status,
            "Seat released"
        );
        Ok(BookingResponse::from(updated))
    }
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    async fn create_booking(
        &self,
        viewer: &Viewer,
        request: CreateBookingRequest,
    ) -> BoxOfficeResult<BookingResponse> {
        let user_id = require_user(viewer)?;
        request.validate_request()?;
        let seat_number = request.seat_number.trim();
        debug!("Booking seat {} for event {}", seat_number, request.event_id);

        let _inventory = self.locks.lock(request.event_id).await;

        let mut event = self.load_event(request.event_id).await?;
        if event.status != EventStatus::Approved {
            return Err(BoxOfficeError::BusinessRule(format!(
                "event {} is not open for booking",
                event.id
            )));
        }
        if self
            .bookings
            .find_active_by_seat(&event.id, seat_number)
            .await?
            .is_some()
        {
            return Err(BoxOfficeError::conflict(format!(
                "seat {seat_number} is already booked"
            )));
        }

        // Charged at the price the buyer saw, before this sale moves inventory.
        let price = pricing::event_price(&event)?;
        event.record_sale()?;

        let booking = Booking::new(event.id, user_id, seat_number, price)?;
        let saved = self.bookings.save(&booking).await?;
        if let Err(e) = self.events.update(&event).await {
            warn!(
                booking_id = %saved.id,
                error = %e,
                "Inventory update failed, withdrawing booking"
            );
            let withdrawn = self.bookings.delete(&saved.id).await;
            self.invalidator
                .on_booking_mutation(saved.event_id, saved.user_id)
                .await?;
            withdrawn?;
            return Err(e);
        }

        self.invalidator
            .on_event_mutation(event.id, event.created_by)
            .await?;
        self.invalidator
            .on_booking_mutation(saved.event_id, saved.user_id)
            .await?;

        info!(
            booking_id = %saved.id,
            event_id = %saved.event_id,
            price = saved.ticket_price,
            "Booking created"
        );
        Ok(BookingResponse::from(saved))
    }

    async fn cancel_booking(
        &self,
        viewer: &Viewer,
        id: BookingId,
    ) -> BoxOfficeResult<BookingResponse> {
        debug!("Cancelling booking: {}", id);
        self.release(viewer, id, Booking::cancel).await
    }

    async fn refund_booking(
        &self,
        viewer: &Viewer,
        id: BookingId,
    ) -> BoxOfficeResult<BookingResponse> {
        debug!("Refunding booking: {}", id);
        self.release(viewer, id, Booking::refund).await
    }

    async fn bookings_for_user(
        &self,
        viewer: &Viewer,
        user_id: UserId,
    ) -> BoxOfficeResult<Vec<BookingResponse>> {
        require_self_or_admin(viewer, user_id)?;
        let bookings = Arc::clone(&self.bookings);
        let list: Vec<Booking> = self
            .cache
            .fetch(&cache_keys::bookings_for_user(user_id), None, move || async move {
                bookings.find_by_user(&user_id).await
            })
            .await?;

        Ok(list.into_iter().map(BookingResponse::from).collect())
    }

    async fn bookings_for_event(
        &self,
        viewer: &Viewer,
        event_id: EventId,
    ) -> BoxOfficeResult<Vec<BookingResponse>> {
        let event = self.load_event(event_id).await?;
        if !viewer.can_manage(&event) {
            return Err(BoxOfficeError::forbidden(format!(
                "event {event_id} belongs to another organizer"
            )));
        }

        let bookings = Arc::clone(&self.bookings);
        let list: Vec<Booking> = self
            .cache
            .fetch(&cache_keys::bookings_for_event(event_id), None, move || async move {
                bookings.find_by_event(&event_id).await
            })
            .await?;

        Ok(list.into_iter().map(BookingResponse::from).collect())
    }

    async fn seat_map(&self, event_id: EventId) -> BoxOfficeResult<SeatMap> {
        let events = Arc::clone(&self.events);
        let bookings = Arc::clone(&self.bookings);
        self.cache
            .fetch(&cache_keys::seat_map(event_id), None, move || async move {
                let event = events
                    .find_by_id(&event_id)
                    .await?
                    .ok_or_else(|| BoxOfficeError::not_found("Event", event_id))?;
                let held = bookings.find_by_event(&event_id).await?;
                Ok(SeatMap::from_bookings(event_id, event.total_seats, &held))
            })
            .await
    }
}

impl std::fmt::Debug for BookingServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingServiceImpl").finish_non_exhaustive()
    }
}
