//! # Box Office Core
//!
//! Core types, domain entities, repository ports and error definitions for
//! the Box Office ticketing backend. Every other crate in the workspace
//! builds on the abstractions defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::entities::*;
pub use domain::value_objects::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
