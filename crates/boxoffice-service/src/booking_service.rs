//! Booking service trait definition.

use crate::dto::{BookingResponse, CreateBookingRequest, SeatMap, Viewer};
use async_trait::async_trait;
use boxoffice_core::{BookingId, BoxOfficeResult, EventId, UserId};

/// Booking service trait.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Books a seat at the event's current dynamic price.
    async fn create_booking(
        &self,
        viewer: &Viewer,
        request: CreateBookingRequest,
    ) -> BoxOfficeResult<BookingResponse>;

    /// Cancels a booking and releases its seat.
    async fn cancel_booking(&self, viewer: &Viewer, id: BookingId)
        -> BoxOfficeResult<BookingResponse>;

    /// Refunds a booking and releases its seat.
    async fn refund_booking(&self, viewer: &Viewer, id: BookingId)
        -> BoxOfficeResult<BookingResponse>;

    /// Lists a user's bookings. Visible to that user and admins.
    async fn bookings_for_user(
        &self,
        viewer: &Viewer,
        user_id: UserId,
    ) -> BoxOfficeResult<Vec<BookingResponse>>;

    /// Lists an event's bookings. Visible to the event's owner and admins.
    async fn bookings_for_event(
        &self,
        viewer: &Viewer,
        event_id: EventId,
    ) -> BoxOfficeResult<Vec<BookingResponse>>;

    /// Seats currently held for an event.
    async fn seat_map(&self, event_id: EventId) -> BoxOfficeResult<SeatMap>;
}
