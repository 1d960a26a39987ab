//! Event-related DTOs.

use super::Viewer;
use crate::pricing;
use boxoffice_core::validation::rules;
use boxoffice_core::{
    BoxOfficeResult, DynamicPricing, Event, EventId, EventStatus, NewEvent, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create an event. New events always start pending.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(
        length(max = 200, message = "Name cannot exceed 200 characters"),
        custom(function = "rules::not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub description: String,

    #[validate(custom(function = "rules::event_date"))]
    pub date: String,

    #[validate(custom(function = "rules::event_time"))]
    pub time: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub venue: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub category: String,

    #[validate(range(min = 1, message = "An event needs at least one seat"))]
    pub total_seats: u32,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(range(min = 0.0, message = "Ticket price cannot be negative"))]
    pub ticket_price: f64,

    #[serde(default)]
    pub dynamic_pricing: DynamicPricing,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(request: CreateEventRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            date: request.date,
            time: request.time,
            venue: request.venue,
            category: request.category,
            total_seats: request.total_seats,
            image_url: request.image_url,
            ticket_price: request.ticket_price,
            dynamic_pricing: request.dynamic_pricing,
        }
    }
}

/// Partial event update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(
        length(max = 200, message = "Name cannot exceed 200 characters"),
        custom(function = "rules::not_blank")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "rules::event_date"))]
    pub date: Option<String>,

    #[validate(custom(function = "rules::event_time"))]
    pub time: Option<String>,

    pub venue: Option<String>,

    pub category: Option<String>,

    #[validate(range(min = 1, message = "An event needs at least one seat"))]
    pub total_seats: Option<u32>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(range(min = 0.0, message = "Ticket price cannot be negative"))]
    pub ticket_price: Option<f64>,

    pub dynamic_pricing: Option<DynamicPricing>,
}

/// Request to move an event through moderation (admin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventStatusRequest {
    pub status: EventStatus,
}

/// Filters for the unrestricted event listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    pub category: Option<String>,
    pub date: Option<String>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub status: Option<EventStatus>,
}

impl EventQuery {
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if self.category.as_deref().is_some_and(|c| c != event.category) {
            return false;
        }
        if self.date.as_deref().is_some_and(|d| d != event.date) {
            return false;
        }
        if self.status.is_some_and(|s| s != event.status) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) => {
                event.name.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Event as rendered for one viewer.
///
/// Owners and admins get the base price, the pricing rules and revenue.
/// Everyone else gets `current_ticket_price`, computed from the snapshot at
/// render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub category: String,
    pub total_seats: u32,
    pub available_seats: i64,
    pub sold_tickets: u32,
    pub image_url: Option<String>,
    pub ticket_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ticket_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_pricing: Option<DynamicPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    pub created_by: UserId,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    /// Renders `event` for `viewer`. A malformed pricing rule rejects the
    /// read rather than silently falling back to the base price.
    pub fn for_viewer(event: &Event, viewer: &Viewer) -> BoxOfficeResult<Self> {
        let privileged = viewer.can_manage(event);
        let current_ticket_price = if privileged {
            None
        } else {
            Some(pricing::event_price(event)?)
        };

        Ok(Self {
            id: event.id,
            name: event.name.clone(),
            description: event.description.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            venue: event.venue.clone(),
            category: event.category.clone(),
            total_seats: event.total_seats,
            available_seats: event.available_seats(),
            sold_tickets: event.sold_tickets,
            image_url: event.image_url.clone(),
            ticket_price: event.ticket_price,
            current_ticket_price,
            dynamic_pricing: privileged.then(|| event.dynamic_pricing.clone()),
            revenue: privileged.then_some(event.revenue),
            created_by: event.created_by,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }

    /// Renders a list of events for `viewer`.
    pub fn list_for_viewer(events: &[Event], viewer: &Viewer) -> BoxOfficeResult<Vec<Self>> {
        events
            .iter()
            .map(|event| Self::for_viewer(event, viewer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::{BoxOfficeError, PricingRule, UserRole, ValidateExt};

    fn priced_event(owner: UserId, sold: u32) -> Event {
        let mut event = Event::new(
            NewEvent {
                name: "Derby".to_string(),
                description: "Season opener".to_string(),
                date: "2026-11-07".to_string(),
                time: "15:00".to_string(),
                venue: "North Stadium".to_string(),
                category: "sport".to_string(),
                total_seats: 100,
                image_url: None,
                ticket_price: 100.0,
                dynamic_pricing: DynamicPricing::with_rules(vec![
                    PricingRule::new(10, 10.0),
                    PricingRule::new(5, 20.0),
                ]),
            },
            owner,
        )
        .unwrap();
        event.sold_tickets = sold;
        event
    }

    #[test]
    fn test_attendee_sees_current_price_only() {
        let event = priced_event(UserId::new(), 96);
        let viewer = Viewer::user(UserId::new(), UserRole::User);
        let response = EventResponse::for_viewer(&event, &viewer).unwrap();

        assert_eq!(response.current_ticket_price, Some(132.0));
        assert!(response.dynamic_pricing.is_none());
        assert!(response.revenue.is_none());
        assert_eq!(response.available_seats, 4);
    }

    #[test]
    fn test_owner_and_admin_see_pricing_rules() {
        let owner = UserId::new();
        let event = priced_event(owner, 96);

        for viewer in [
            Viewer::user(owner, UserRole::Organizer),
            Viewer::user(UserId::new(), UserRole::Admin),
        ] {
            let response = EventResponse::for_viewer(&event, &viewer).unwrap();
            assert!(response.current_ticket_price.is_none());
            assert_eq!(response.dynamic_pricing.map(|p| p.rules.len()), Some(2));
            assert_eq!(response.ticket_price, 100.0);
        }
    }

    #[test]
    fn test_other_organizer_is_not_privileged() {
        let event = priced_event(UserId::new(), 92);
        let viewer = Viewer::user(UserId::new(), UserRole::Organizer);
        let response = EventResponse::for_viewer(&event, &viewer).unwrap();
        assert_eq!(response.current_ticket_price, Some(110.0));
    }

    #[test]
    fn test_malformed_stored_rule_rejects_read() {
        let mut event = priced_event(UserId::new(), 50);
        event.dynamic_pricing.rules.push(PricingRule::new(-4, 10.0));
        let result = EventResponse::for_viewer(&event, &Viewer::anonymous());
        assert!(matches!(result, Err(BoxOfficeError::Pricing(_))));
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateEventRequest {
            name: "  ".to_string(),
            description: "d".to_string(),
            date: "2026-02-30".to_string(),
            time: "18:00".to_string(),
            venue: "v".to_string(),
            category: "c".to_string(),
            total_seats: 0,
            image_url: None,
            ticket_price: 10.0,
            dynamic_pricing: DynamicPricing::disabled(),
        };
        let err = request.validate_request().unwrap_err();
        let BoxOfficeError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("name"));
        assert!(message.contains("date"));
        assert!(message.contains("total_seats"));
    }

    #[test]
    fn test_event_query_matches() {
        let event = priced_event(UserId::new(), 0);
        let query = EventQuery {
            search: Some("OPENER".to_string()),
            category: Some("sport".to_string()),
            ..EventQuery::default()
        };
        assert!(query.matches(&event));

        let query = EventQuery {
            status: Some(EventStatus::Approved),
            ..EventQuery::default()
        };
        assert!(!query.matches(&event));
    }
}
