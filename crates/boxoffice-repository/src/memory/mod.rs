//! In-process repository adapters.

mod booking_repository;
mod event_repository;
mod table;
mod user_repository;

pub use booking_repository::InMemoryBookingRepository;
pub use event_repository::InMemoryEventRepository;
pub use table::MemoryTable;
pub use user_repository::InMemoryUserRepository;
