//! Expression events
//!
//! Reported by the state machine whenever something visible changes, so
//! the driver can log transitions.

use super::machine::Mood;

/// Result of one mood evaluation roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EvalOutcome {
    /// Play a blink
    Blink,
    /// Switch to a mood for a random duration
    Mood(Mood),
}

/// Transitions of the expression state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExpressionEvent {
    /// A timed mood ran out and the eyes are back to DEFAULT
    MoodExpired(Mood),
    /// A mood started
    MoodStarted {
        mood: Mood,
        /// How long the mood lasts
        duration_ms: u32,
    },
    /// A blink animation started
    BlinkStarted,
    /// A blink animation finished
    BlinkFinished,
}

impl ExpressionEvent {
    /// Check if this event changes the mood
    pub fn is_mood_change(&self) -> bool {
        matches!(self, Self::MoodExpired(_) | Self::MoodStarted { .. })
    }
}
