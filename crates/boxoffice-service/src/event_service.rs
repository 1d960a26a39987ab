//! Event service trait definition.

use crate::dto::{
    CreateEventRequest, EventQuery, EventResponse, UpdateEventRequest, UpdateEventStatusRequest,
    Viewer,
};
use async_trait::async_trait;
use boxoffice_core::{BoxOfficeResult, EventId, UserId};

/// Event service trait.
///
/// Every mutation commits to storage first and then clears the dependent
/// cache entries before returning, so the caller's next read is fresh.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Creates a pending event owned by the viewer (organizers and admins).
    async fn create_event(
        &self,
        viewer: &Viewer,
        request: CreateEventRequest,
    ) -> BoxOfficeResult<EventResponse>;

    /// Updates an event. Only its owner or an admin may do this.
    async fn update_event(
        &self,
        viewer: &Viewer,
        id: EventId,
        request: UpdateEventRequest,
    ) -> BoxOfficeResult<EventResponse>;

    /// Moves an event through moderation (admin only).
    async fn update_status(
        &self,
        viewer: &Viewer,
        id: EventId,
        request: UpdateEventStatusRequest,
    ) -> BoxOfficeResult<EventResponse>;

    /// Deletes an event. Only its owner or an admin may do this.
    async fn delete_event(&self, viewer: &Viewer, id: EventId) -> BoxOfficeResult<()>;

    /// Gets an event, priced for the viewer.
    async fn get_event(&self, viewer: &Viewer, id: EventId) -> BoxOfficeResult<EventResponse>;

    /// Lists approved upcoming events.
    async fn list_approved(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<EventResponse>>;

    /// Lists events awaiting moderation (admin only).
    async fn list_pending(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<EventResponse>>;

    /// Lists the events an organizer created. Visible to that organizer and admins.
    async fn list_by_organizer(
        &self,
        viewer: &Viewer,
        organizer_id: UserId,
    ) -> BoxOfficeResult<Vec<EventResponse>>;

    /// Filters every event, regardless of status (admin only). Not cached.
    async fn search_events(
        &self,
        viewer: &Viewer,
        query: EventQuery,
    ) -> BoxOfficeResult<Vec<EventResponse>>;
}
