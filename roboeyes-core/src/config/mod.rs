//! Configuration types
//!
//! Startup configuration for eye geometry, timing and mood policy.
//! Values are fixed once [`crate::RoboEyes`] is built, apart from the
//! idle-mode switch.

pub mod types;

pub use types::*;
