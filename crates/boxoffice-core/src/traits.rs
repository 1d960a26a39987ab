//! Core traits: entity identity and repository ports.
//!
//! The service layer only talks to storage through these traits. Concrete
//! adapters live outside this crate.

use crate::{
    Booking, BookingId, BoxOfficeResult, Email, Event, EventId, EventStatus, User, UserId,
    UserRole,
};
use async_trait::async_trait;

/// Trait for entities with a unique identifier.
pub trait Entity<ID> {
    /// Returns the entity's unique identifier.
    fn id(&self) -> &ID;
}

/// Base repository trait for CRUD operations.
#[async_trait]
pub trait Repository<T, ID>: Send + Sync
where
    T: Send + Sync,
    ID: Send + Sync,
{
    /// Finds an entity by its ID.
    async fn find_by_id(&self, id: &ID) -> BoxOfficeResult<Option<T>>;

    /// Saves a new entity.
    async fn save(&self, entity: &T) -> BoxOfficeResult<T>;

    /// Updates an existing entity.
    async fn update(&self, entity: &T) -> BoxOfficeResult<T>;

    /// Deletes an entity by its ID. Returns whether it existed.
    async fn delete(&self, id: &ID) -> BoxOfficeResult<bool>;
}

/// Storage port for events.
#[async_trait]
pub trait EventRepository: Repository<Event, EventId> {
    /// Events in the given moderation status, newest first.
    async fn find_by_status(&self, status: EventStatus) -> BoxOfficeResult<Vec<Event>>;

    /// Events created by an organizer, newest first.
    async fn find_by_organizer(&self, organizer_id: &UserId) -> BoxOfficeResult<Vec<Event>>;

    /// All events regardless of status.
    async fn find_all(&self) -> BoxOfficeResult<Vec<Event>>;
}

/// Storage port for bookings.
#[async_trait]
pub trait BookingRepository: Repository<Booking, BookingId> {
    /// Bookings held by a user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> BoxOfficeResult<Vec<Booking>>;

    /// Bookings for an event, newest first.
    async fn find_by_event(&self, event_id: &EventId) -> BoxOfficeResult<Vec<Booking>>;

    /// The active booking holding `seat_number` for an event, if any.
    async fn find_active_by_seat(
        &self,
        event_id: &EventId,
        seat_number: &str,
    ) -> BoxOfficeResult<Option<Booking>>;
}

/// Storage port for users.
#[async_trait]
pub trait UserRepository: Repository<User, UserId> {
    /// Looks a user up by normalized email.
    async fn find_by_email(&self, email: &Email) -> BoxOfficeResult<Option<User>>;

    /// Users holding a role.
    async fn find_by_role(&self, role: UserRole) -> BoxOfficeResult<Vec<User>>;

    /// All users.
    async fn find_all(&self) -> BoxOfficeResult<Vec<User>>;
}
