//! Value objects.

mod email;
mod pricing;
mod role;
mod status;

pub use email::*;
pub use pricing::*;
pub use role::*;
pub use status::*;
