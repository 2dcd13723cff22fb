//! Blink sub-animation
//!
//! A blink walks through [`BLINK_SEQUENCE`](crate::sprite::BLINK_SEQUENCE)
//! one frame per `blink_frame_ms`. Advancement is driven by time, not by
//! the number of ticks.

use crate::sprite::BLINK_FRAME_COUNT;

/// Blink progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkAnimation {
    active: bool,
    frame: usize,
    next_frame_ms: u64,
}

impl BlinkAnimation {
    pub const fn new() -> Self {
        Self {
            active: false,
            frame: 0,
            next_frame_ms: 0,
        }
    }

    /// Arm the blink at frame 0 with the first advance due at `first_advance_ms`
    ///
    /// Returns false if a blink is already running.
    pub fn start(&mut self, first_advance_ms: u64) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.frame = 0;
        self.next_frame_ms = first_advance_ms;
        true
    }

    /// Advance one frame if due
    ///
    /// Returns true when this call finished the blink.
    pub fn advance(&mut self, now_ms: u64, frame_ms: u32) -> bool {
        if !self.active || now_ms < self.next_frame_ms {
            return false;
        }
        self.frame += 1;
        if self.frame >= BLINK_FRAME_COUNT {
            self.active = false;
            self.frame = 0;
            return true;
        }
        self.next_frame_ms = now_ms + frame_ms as u64;
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current frame index (0 when idle)
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Time budget of a whole blink, used to push back the next evaluation
    ///
    /// Saturates at `u32::MAX` for very long frames.
    pub fn total_duration_ms(frame_ms: u32) -> u32 {
        (BLINK_FRAME_COUNT as u32 - 1).saturating_mul(frame_ms)
    }
}
