//! In-memory booking repository.

use super::MemoryTable;
use async_trait::async_trait;
use boxoffice_core::{
    Booking, BookingId, BookingRepository, BoxOfficeError, BoxOfficeResult, EventId, Repository,
    UserId,
};

/// Booking storage held in process memory.
pub struct InMemoryBookingRepository {
    bookings: MemoryTable<BookingId, Booking>,
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bookings: MemoryTable::new("Booking"),
        }
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
    bookings
}

#[async_trait]
impl Repository<Booking, BookingId> for InMemoryBookingRepository {
    async fn find_by_id(&self, id: &BookingId) -> BoxOfficeResult<Option<Booking>> {
        Ok(self.bookings.get(id))
    }

    /// Rejects a second active booking for the same seat.
    async fn save(&self, booking: &Booking) -> BoxOfficeResult<Booking> {
        let taken = self.bookings.find(|b| {
            b.event_id == booking.event_id
                && b.seat_number == booking.seat_number
                && b.status.holds_seat()
        });
        if taken.is_some() {
            return Err(BoxOfficeError::conflict(format!(
                "seat {} is already booked",
                booking.seat_number
            )));
        }
        self.bookings.insert(booking)
    }

    async fn update(&self, booking: &Booking) -> BoxOfficeResult<Booking> {
        self.bookings.replace(booking)
    }

    async fn delete(&self, id: &BookingId) -> BoxOfficeResult<bool> {
        Ok(self.bookings.remove(id))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_user(&self, user_id: &UserId) -> BoxOfficeResult<Vec<Booking>> {
        Ok(newest_first(self.bookings.filter(|b| b.user_id == *user_id)))
    }

    async fn find_by_event(&self, event_id: &EventId) -> BoxOfficeResult<Vec<Booking>> {
        Ok(newest_first(
            self.bookings.filter(|b| b.event_id == *event_id),
        ))
    }

    async fn find_active_by_seat(
        &self,
        event_id: &EventId,
        seat_number: &str,
    ) -> BoxOfficeResult<Option<Booking>> {
        Ok(self.bookings.find(|b| {
            b.event_id == *event_id && b.seat_number == seat_number && b.status.holds_seat()
        }))
    }
}
