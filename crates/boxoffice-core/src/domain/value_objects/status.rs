//! Lifecycle statuses for events and bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Awaiting admin review. Every new event starts here.
    #[default]
    Pending,
    /// Visible to attendees.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

impl EventStatus {
    /// Returns the lowercase wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Holds a seat.
    #[default]
    Active,
    /// Cancelled by the attendee; the seat is released.
    Cancelled,
    /// Refunded; the seat is released.
    Refunded,
}

impl BookingStatus {
    /// Whether the booking still occupies its seat.
    #[must_use]
    pub const fn holds_seat(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_status_defaults_to_pending() {
        assert_eq!(EventStatus::default(), EventStatus::Pending);
        assert_eq!(EventStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn test_booking_status_holds_seat() {
        assert!(BookingStatus::Active.holds_seat());
        assert!(!BookingStatus::Cancelled.holds_seat());
        assert!(!BookingStatus::Refunded.holds_seat());
    }
}
