//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `event_service.rs`).
//! Each implementation reads through [`CacheAside`](crate::cache::CacheAside)
//! and, after every committed write, clears the affected keys through
//! [`CacheInvalidator`](crate::cache::CacheInvalidator) before returning.

pub mod booking_service_impl;
pub mod event_service_impl;
pub mod user_service_impl;

pub use booking_service_impl::BookingServiceImpl;
pub use event_service_impl::EventServiceImpl;
pub use user_service_impl::UserServiceImpl;

use crate::dto::Viewer;
use boxoffice_core::{BoxOfficeError, BoxOfficeResult, UserId};

/// The caller's id, or `Forbidden` for anonymous viewers.
fn require_user(viewer: &Viewer) -> BoxOfficeResult<UserId> {
    viewer
        .user_id
        .ok_or_else(|| BoxOfficeError::forbidden("authentication required"))
}

fn require_admin(viewer: &Viewer, action: &str) -> BoxOfficeResult<()> {
    if viewer.is_admin() {
        Ok(())
    } else {
        Err(BoxOfficeError::forbidden(format!("only admins may {action}")))
    }
}

/// Admins, or the viewer acting on their own resource.
fn require_self_or_admin(viewer: &Viewer, subject: UserId) -> BoxOfficeResult<()> {
    if viewer.is_admin() || viewer.user_id == Some(subject) {
        Ok(())
    } else {
        Err(BoxOfficeError::forbidden("cannot act on another user's resources"))
    }
}
