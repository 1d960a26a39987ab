//! Domain entities.

mod booking;
mod event;
mod user;

pub use booking::*;
pub use event::*;
pub use user::*;
