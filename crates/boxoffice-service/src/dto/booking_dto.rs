//! Booking-related DTOs.

use boxoffice_core::validation::rules;
use boxoffice_core::{
    Booking, BookingId, BookingStatus, EventId, PaymentStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to book a seat.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub event_id: EventId,

    #[validate(
        length(max = 16, message = "Seat number cannot exceed 16 characters"),
        custom(function = "rules::not_blank")
    )]
    pub seat_number: String,
}

/// Booking response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: BookingId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub seat_number: String,
    pub ticket_price: f64,
    pub payment_status: PaymentStatus,
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            user_id: booking.user_id,
            seat_number: booking.seat_number,
            ticket_price: booking.ticket_price,
            payment_status: booking.payment_status,
            qr_code: booking.qr_code,
            booking_date: booking.booking_date,
            status: booking.status,
        }
    }
}

/// Seats of an event currently held by active bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    pub event_id: EventId,
    pub total_seats: u32,
    /// Booked seat numbers, sorted.
    pub booked_seats: Vec<String>,
}

impl SeatMap {
    /// Builds the map from an event's bookings, keeping only those that hold
    /// a seat.
    #[must_use]
    pub fn from_bookings(event_id: EventId, total_seats: u32, bookings: &[Booking]) -> Self {
        let mut booked_seats: Vec<String> = bookings
            .iter()
            .filter(|b| b.event_id == event_id && b.status.holds_seat())
            .map(|b| b.seat_number.clone())
            .collect();
        booked_seats.sort();
        booked_seats.dedup();
        Self {
            event_id,
            total_seats,
            booked_seats,
        }
    }

    #[must_use]
    pub fn is_booked(&self, seat_number: &str) -> bool {
        self.booked_seats.iter().any(|s| s == seat_number)
    }
}
