//! Board-agnostic core logic for the RoboEyes firmware
//!
//! This crate contains everything that decides what the eyes look like on a
//! given frame, without depending on a specific display or MCU:
//!
//! - Sprite builder (pre-rendered rounded-rectangle eye shapes)
//! - Expression state machine (moods, blink sub-animation, random scheduling)
//! - Idle motion controller (random drift targets and smoothing)
//! - Frame compositor and 1-bit frame buffer
//! - Frame pacing for the outer tick loop
//! - Collaborator traits (display, clock) and configuration types
//!
//! The entry point is [`RoboEyes`]: build it once with [`RoboEyes::begin`] and
//! call [`RoboEyes::update`] once per tick, then hand [`RoboEyes::frame`] to
//! an [`EyeDisplay`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod compositor;
pub mod config;
pub mod expression;
pub mod eyes;
pub mod framebuffer;
pub mod motion;
pub mod pacing;
pub mod schedule;
pub mod sprite;
pub mod traits;

pub use config::{ConfigError, EyesConfig};
pub use expression::{ExpressionEvent, Mood};
pub use eyes::{EyesEvent, EyesStatus, RoboEyes};
pub use framebuffer::{FrameBuffer, Palette};
pub use traits::{Clock, DisplayError, EyeDisplay, ManualClock};
