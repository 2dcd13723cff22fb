//! Eye positions and idle motion
//!
//! Eyes ease toward a target position every tick; every few seconds the
//! idle controller picks a new random target for both eyes.

pub mod idle;
pub mod position;

pub use idle::{IdleMotion, LegalBox};
pub use position::{round_to_i32, EyePair, EyePosition};
