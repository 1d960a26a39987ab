//! Cache key generators for consistent key naming.
//!
//! Every function returns a [`CacheKey`] that names its namespace explicitly,
//! so a read or write is always routed to exactly one partition of the store.
//! The string form is `{namespace}:{entity}:{discriminator}:{value}`; each
//! function owns a distinct discriminator, so keys from different functions
//! never collide.

use boxoffice_core::{EventId, UserId, UserRole};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known list view names.
pub mod views {
    /// Approved, publicly listed events.
    pub const APPROVED: &str = "approved";
    /// Events awaiting moderation.
    pub const PENDING: &str = "pending";
    /// Every entity of a kind.
    pub const ALL: &str = "all";
}

/// A logical partition of the cache with its own TTL and sweep cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Events,
    Users,
    Bookings,
}

impl Namespace {
    /// All namespaces, in a stable order.
    pub const ALL: [Self; 3] = [Self::Events, Self::Users, Self::Bookings];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Users => "users",
            Self::Bookings => "bookings",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kinds that have id, owner and list keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    User,
    Booking,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::User => "user",
            Self::Booking => "booking",
        }
    }

    /// The namespace this kind's keys live in.
    #[must_use]
    pub const fn namespace(self) -> Namespace {
        match self {
            Self::Event => Namespace::Events,
            Self::User => Namespace::Users,
            Self::Booking => Namespace::Bookings,
        }
    }
}

/// A fully routed cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    key: String,
}

impl CacheKey {
    /// Builds a key in `namespace`. Prefer the generator functions in this
    /// module; this exists for ad-hoc keys and tests.
    #[must_use]
    pub fn new(namespace: Namespace, key: impl Into<String>) -> Self {
        Self {
            namespace,
            key: key.into(),
        }
    }

    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn compose(
    namespace: Namespace,
    entity: &str,
    discriminator: &str,
    value: impl fmt::Display,
) -> CacheKey {
    CacheKey::new(
        namespace,
        format!("{namespace}:{entity}:{discriminator}:{value}"),
    )
}

/// Key for a single entity by id.
#[must_use]
pub fn by_id(kind: EntityKind, id: impl fmt::Display) -> CacheKey {
    compose(kind.namespace(), kind.as_str(), "id", id)
}

/// Key for the entities owned by `owner_id` (an organizer's events).
#[must_use]
pub fn by_owner(kind: EntityKind, owner_id: UserId) -> CacheKey {
    compose(kind.namespace(), kind.as_str(), "owner", owner_id)
}

/// Key for a named list view, such as [`views::APPROVED`].
#[must_use]
pub fn list_view(kind: EntityKind, view: &str) -> CacheKey {
    compose(kind.namespace(), kind.as_str(), "list", view)
}

/// Key for the booked-seat map of an event.
#[must_use]
pub fn seat_map(event_id: EventId) -> CacheKey {
    compose(Namespace::Bookings, "seat", "event", event_id)
}

/// Key for the bookings held by a user.
#[must_use]
pub fn bookings_for_user(user_id: UserId) -> CacheKey {
    compose(Namespace::Bookings, EntityKind::Booking.as_str(), "user", user_id)
}

/// Key for the bookings made against an event.
#[must_use]
pub fn bookings_for_event(event_id: EventId) -> CacheKey {
    compose(Namespace::Bookings, EntityKind::Booking.as_str(), "event", event_id)
}

/// Key for a user looked up by email. The email is lowercased.
#[must_use]
pub fn user_by_email(email: &str) -> CacheKey {
    compose(
        Namespace::Users,
        EntityKind::User.as_str(),
        "email",
        email.trim().to_lowercase(),
    )
}

/// Key for the users holding a role.
#[must_use]
pub fn users_by_role(role: UserRole) -> CacheKey {
    compose(Namespace::Users, EntityKind::User.as_str(), "role", role.as_str())
}
