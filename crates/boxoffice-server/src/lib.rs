//! # Box Office Server Library
//!
//! Wiring and lifecycle for the Box Office process: configuration, logging,
//! the Prometheus exporter, explicit service construction and the cache
//! expiry sweeper.

pub mod app;
pub mod container;
pub mod startup;

pub use app::AppBuilder;
pub use container::{AppContainer, Repositories};
