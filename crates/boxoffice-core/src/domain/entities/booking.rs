//! Booking entity.

use super::super::value_objects::{BookingStatus, PaymentStatus};
use crate::{BookingId, BoxOfficeError, BoxOfficeResult, Entity, EventId, UserId};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seat booked by a user for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub seat_number: String,
    /// Price actually charged, i.e. the dynamic price at booking time.
    pub ticket_price: f64,
    pub payment_status: PaymentStatus,
    /// Base64 JSON payload identifying the booking at the door.
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    booking_id: BookingId,
    event_id: EventId,
    user_id: UserId,
    seat_number: &'a str,
}

impl Booking {
    /// Creates an active booking and generates its QR code.
    pub fn new(
        event_id: EventId,
        user_id: UserId,
        seat_number: impl Into<String>,
        ticket_price: f64,
    ) -> BoxOfficeResult<Self> {
        let seat_number = seat_number.into().trim().to_string();
        if seat_number.is_empty() {
            return Err(BoxOfficeError::validation("seat number is required"));
        }

        let now = Utc::now();
        let mut booking = Self {
            id: BookingId::new(),
            event_id,
            user_id,
            seat_number,
            ticket_price,
            payment_status: PaymentStatus::Pending,
            qr_code: String::new(),
            booking_date: now,
            status: BookingStatus::Active,
            created_at: now,
            updated_at: now,
        };
        booking.qr_code = booking.generate_qr_code()?;
        Ok(booking)
    }

    /// Encodes the booking identity as the QR payload.
    pub fn generate_qr_code(&self) -> BoxOfficeResult<String> {
        let payload = serde_json::to_vec(&QrPayload {
            booking_id: self.id,
            event_id: self.event_id,
            user_id: self.user_id,
            seat_number: &self.seat_number,
        })?;
        Ok(STANDARD.encode(payload))
    }

    /// Cancels an active booking.
    pub fn cancel(&mut self) -> BoxOfficeResult<()> {
        self.transition(BookingStatus::Cancelled)?;
        self.payment_status = PaymentStatus::Cancelled;
        Ok(())
    }

    /// Refunds an active booking.
    pub fn refund(&mut self) -> BoxOfficeResult<()> {
        self.transition(BookingStatus::Refunded)
    }

    fn transition(&mut self, next: BookingStatus) -> BoxOfficeResult<()> {
        if !self.status.holds_seat() {
            return Err(BoxOfficeError::BusinessRule(format!(
                "booking {} is already {}",
                self.id, self.status
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl Entity<BookingId> for Booking {
    fn id(&self) -> &BookingId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_generates_qr_code() {
        let booking = Booking::new(EventId::new(), UserId::new(), " A12 ", 55.0).unwrap();
        assert_eq!(booking.seat_number, "A12");
        assert_eq!(booking.status, BookingStatus::Active);

        let decoded = STANDARD.decode(&booking.qr_code).unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(payload["seatNumber"], "A12");
        assert_eq!(payload["bookingId"], booking.id.to_string());
    }

    #[test]
    fn test_blank_seat_rejected() {
        assert!(Booking::new(EventId::new(), UserId::new(), "  ", 10.0).is_err());
    }

    #[test]
    fn test_refund_keeps_payment_pending() {
        let mut booking = Booking::new(EventId::new(), UserId::new(), "C1", 10.0).unwrap();
        booking.refund().unwrap();
        assert_eq!(booking.status, BookingStatus::Refunded);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_cancel_then_refund_is_rejected() {
        let mut booking = Booking::new(EventId::new(), UserId::new(), "B3", 10.0).unwrap();
        booking.cancel().unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Cancelled);
        assert!(booking.refund().is_err());
    }
}
