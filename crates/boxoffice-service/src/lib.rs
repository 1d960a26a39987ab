//! # Box Office Service
//!
//! Application layer for Box Office: the cache subsystem, the dynamic
//! pricing engine, viewer-facing DTOs and the event, booking and user
//! services that drive the cache.
//!
//! Reads go through [`cache::CacheAside`]; every committed write is followed
//! by a [`cache::CacheInvalidator`] call before the service method returns.

pub mod booking_service;
pub mod cache;
pub mod dto;
pub mod event_service;
pub mod r#impl;
pub mod inventory;
pub mod pricing;
pub mod user_service;

pub use booking_service::*;
pub use cache::*;
pub use dto::*;
pub use event_service::*;
pub use inventory::{InventoryGuard, InventoryLocks};
pub use r#impl::{BookingServiceImpl, EventServiceImpl, UserServiceImpl};
pub use user_service::*;
