//! Data Transfer Objects (DTOs).

mod booking_dto;
mod event_dto;
mod user_dto;
mod viewer;

pub use booking_dto::*;
pub use event_dto::*;
pub use user_dto::*;
pub use viewer::*;
