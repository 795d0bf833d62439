//! Built-in routing profiles
//!
//! Each profile implements tag semantics for access, speed and edge attributes.

pub mod car;
pub mod tag_lookup;

pub use car::{CarProfile, EdgeProfile, WayOutcome};
