//! Mutation-driven cache invalidation.
//!
//! A mutation handler calls the matching `on_*` method after its storage write
//! succeeds and awaits it before returning, so a subsequent read observes the
//! write.

use super::cache_keys::{self, views, EntityKind};
use super::{CacheInterface, CacheKey, CacheMetrics};
use boxoffice_core::{BoxOfficeResult, EventId, UserId, UserRole};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// The keys one mutation must clear. Built deterministically from entity
/// ids, never from scanning the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationSet {
    keys: Vec<CacheKey>,
}

impl InvalidationSet {
    /// Keys affected by creating, updating, approving or deleting an event,
    /// or by a sale changing its inventory.
    #[must_use]
    pub fn for_event(event_id: EventId, owner_id: UserId) -> Self {
        Self {
            keys: vec![
                cache_keys::by_id(EntityKind::Event, event_id),
                cache_keys::by_owner(EntityKind::Event, owner_id),
                cache_keys::list_view(EntityKind::Event, views::APPROVED),
                cache_keys::list_view(EntityKind::Event, views::PENDING),
            ],
        }
    }

    /// Keys affected by creating, cancelling or refunding a booking.
    #[must_use]
    pub fn for_booking(event_id: EventId, user_id: UserId) -> Self {
        Self {
            keys: vec![
                cache_keys::seat_map(event_id),
                cache_keys::bookings_for_event(event_id),
                cache_keys::bookings_for_user(user_id),
            ],
        }
    }

    /// Keys affected by a user profile or role change. The email key is only
    /// included when the email is known.
    #[must_use]
    pub fn for_user(user_id: UserId, email: Option<&str>) -> Self {
        let mut keys = vec![
            cache_keys::by_id(EntityKind::User, user_id),
            cache_keys::list_view(EntityKind::User, views::ALL),
        ];
        keys.extend(UserRole::all().into_iter().map(cache_keys::users_by_role));
        if let Some(email) = email {
            keys.push(cache_keys::user_by_email(email));
        }
        Self { keys }
    }

    #[must_use]
    pub fn keys(&self) -> &[CacheKey] {
        &self.keys
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Applies invalidation sets to a cache store.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn CacheInterface>,
}

impl CacheInvalidator {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }

    /// Clears every key in `set`. All deletes are attempted even if one
    /// fails; the first failure is returned afterwards. Returns how many keys
    /// were actually present.
    pub async fn apply(&self, set: &InvalidationSet) -> BoxOfficeResult<u64> {
        let cache = &self.cache;
        let outcomes = join_all(
            set.keys()
                .iter()
                .map(|key| async move { (key, cache.delete(key).await) }),
        )
        .await;

        let mut removed = 0;
        let mut first_error = None;

        for (key, outcome) in outcomes {
            match outcome {
                Ok(true) => {
                    removed += 1;
                    CacheMetrics::invalidated(key.namespace(), 1);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to invalidate cache key");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                debug!(targeted = set.len(), removed, "Cache invalidation applied");
                Ok(removed)
            }
        }
    }

    /// Invalidate after an event mutation.
    pub async fn on_event_mutation(
        &self,
        event_id: EventId,
        owner_id: UserId,
    ) -> BoxOfficeResult<u64> {
        self.apply(&InvalidationSet::for_event(event_id, owner_id)).await
    }

    /// Invalidate after a booking mutation.
    pub async fn on_booking_mutation(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> BoxOfficeResult<u64> {
        self.apply(&InvalidationSet::for_booking(event_id, user_id)).await
    }

    /// Invalidate after a user mutation.
    pub async fn on_user_mutation(
        &self,
        user_id: UserId,
        email: Option<&str>,
    ) -> BoxOfficeResult<u64> {
        self.apply(&InvalidationSet::for_user(user_id, email)).await
    }
}
