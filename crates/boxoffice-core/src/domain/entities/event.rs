//! Event entity.

use super::super::value_objects::{DynamicPricing, EventStatus};
use crate::{BoxOfficeError, BoxOfficeResult, Entity, EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ticketed event.
///
/// This is the snapshot the cache stores. It carries only the inputs to the
/// pricing engine (base price, seats, sold tickets, rules), never a derived
/// current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time, `HH:MM`.
    pub time: String,
    pub venue: String,
    pub category: String,
    pub total_seats: u32,
    pub image_url: Option<String>,
    /// Base ticket price before dynamic pricing.
    pub ticket_price: f64,
    #[serde(default)]
    pub dynamic_pricing: DynamicPricing,
    #[serde(default)]
    pub sold_tickets: u32,
    #[serde(default)]
    pub revenue: f64,
    /// Organizer that owns the event.
    pub created_by: UserId,
    #[serde(default)]
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by an organizer when creating an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub category: String,
    pub total_seats: u32,
    pub image_url: Option<String>,
    pub ticket_price: f64,
    pub dynamic_pricing: DynamicPricing,
}

impl Event {
    /// Creates a pending event owned by `created_by`.
    ///
    /// Pricing rules are validated here so malformed rules are never persisted.
    pub fn new(fields: NewEvent, created_by: UserId) -> BoxOfficeResult<Self> {
        validate_base_price(fields.ticket_price)?;
        fields.dynamic_pricing.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: EventId::new(),
            name: fields.name.trim().to_string(),
            description: fields.description,
            date: fields.date,
            time: fields.time,
            venue: fields.venue,
            category: fields.category,
            total_seats: fields.total_seats,
            image_url: fields.image_url,
            ticket_price: fields.ticket_price,
            dynamic_pricing: fields.dynamic_pricing,
            sold_tickets: 0,
            revenue: 0.0,
            created_by,
            status: EventStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Seats still available. Negative only if storage was oversold.
    #[must_use]
    pub fn available_seats(&self) -> i64 {
        i64::from(self.total_seats) - i64::from(self.sold_tickets)
    }

    /// Whether `user_id` owns this event.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }

    /// Revenue at base price for the tickets sold so far.
    #[must_use]
    pub fn calculate_revenue(&self) -> f64 {
        f64::from(self.sold_tickets) * self.ticket_price
    }

    /// Records one sold ticket and recomputes revenue.
    pub fn record_sale(&mut self) -> BoxOfficeResult<()> {
        if self.available_seats() <= 0 {
            return Err(BoxOfficeError::BusinessRule(format!(
                "event {} is sold out",
                self.id
            )));
        }
        self.sold_tickets += 1;
        self.revenue = self.calculate_revenue();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Releases one sold ticket (cancellation or refund) and recomputes revenue.
    pub fn release_sale(&mut self) {
        self.sold_tickets = self.sold_tickets.saturating_sub(1);
        self.revenue = self.calculate_revenue();
        self.updated_at = Utc::now();
    }

    /// Replaces the base price, validating it first.
    pub fn set_ticket_price(&mut self, ticket_price: f64) -> BoxOfficeResult<()> {
        validate_base_price(ticket_price)?;
        self.ticket_price = ticket_price;
        self.revenue = self.calculate_revenue();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the pricing schedule, validating it first.
    pub fn set_dynamic_pricing(&mut self, pricing: DynamicPricing) -> BoxOfficeResult<()> {
        pricing.validate()?;
        self.dynamic_pricing = pricing;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Changes the moderation status.
    pub fn change_status(&mut self, status: EventStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

impl Entity<EventId> for Event {
    fn id(&self) -> &EventId {
        &self.id
    }
}

fn validate_base_price(price: f64) -> BoxOfficeResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(BoxOfficeError::validation(format!(
            "ticket price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}
