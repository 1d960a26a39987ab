//! # Box Office Domain
//!
//! Domain entities and value objects for the ticketing application.
//! Persistence-time side effects of the original data model (QR code
//! generation, revenue recomputation) are explicit methods here, invoked by
//! the owning service.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
