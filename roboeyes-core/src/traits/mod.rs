//! Collaborator traits
//!
//! These traits define the interface between the animation logic and the
//! hardware it runs on: where frames go and where time comes from.

pub mod clock;
pub mod display;

pub use clock::{Clock, ManualClock};
pub use display::{DisplayError, EyeDisplay};
