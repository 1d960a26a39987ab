//! # Box Office Repository
//!
//! Storage adapters for the repository ports defined in `boxoffice-core`.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn EventRepository>   (port, boxoffice-core)
//! InMemoryEventRepository         (adapter, this crate)
//!   ↓
//! MemoryTable<EventId, Event>
//! ```
//!
//! The in-process adapters back the server binary and the test suites.

pub mod memory;

pub use memory::{
    InMemoryBookingRepository, InMemoryEventRepository, InMemoryUserRepository, MemoryTable,
};
