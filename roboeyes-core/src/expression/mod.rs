//! Expression state machine
//!
//! Decides which mood is active and whether a blink is running.
//! Moods and blinks are driven by time and a random source only; the
//! machine never looks at the screen.

pub mod blink;
pub mod events;
pub mod machine;

pub use blink::BlinkAnimation;
pub use events::{EvalOutcome, ExpressionEvent};
pub use machine::{ExpressionMachine, Mood};
