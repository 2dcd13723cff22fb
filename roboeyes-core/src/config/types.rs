//! Configuration type definitions

use crate::expression::{EvalOutcome, Mood};
use crate::framebuffer::{MAX_HEIGHT, MAX_WIDTH};
use crate::schedule::ScheduleConfig;
use crate::sprite::{MAX_SPRITE_HEIGHT, MAX_SPRITE_WIDTH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Screen width or height is zero
    InvalidScreen,
    /// Screen does not fit in the frame buffer
    ScreenTooLarge,
    /// Eye width or height is zero
    InvalidEyeGeometry,
    /// Eye does not fit in a sprite
    EyeTooLarge,
    /// Frame rate hint is zero
    InvalidFrameRate,
    /// Tween factor outside (0, 1]
    InvalidTweenFactor,
    /// Event weights are negative, NaN or sum to zero
    InvalidWeights,
    /// A probability is outside [0, 1]
    InvalidProbability,
    /// Duration range with min > max
    InvalidDurationRange,
    /// Blink frame duration is zero
    InvalidBlinkFrame,
}

/// Eye geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyeGeometry {
    /// Nominal eye width
    pub width: u16,
    /// Nominal eye height (the vertical slot shorter sprites are centred in)
    pub height: u16,
    /// Corner radius of the open eye
    pub corner_radius: u16,
    /// Horizontal gap between the two eyes
    pub spacing: u16,
    /// Minimum distance from the screen edge while idling
    pub edge_margin: u16,
}

impl Default for EyeGeometry {
    fn default() -> Self {
        Self {
            width: 36,
            height: 36,
            corner_radius: 8,
            spacing: 10,
            edge_margin: 5,
        }
    }
}

/// Inclusive range of durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DurationRange {
    pub min_ms: u32,
    pub max_ms: u32,
}

impl DurationRange {
    pub const fn new(min_ms: u32, max_ms: u32) -> Self {
        Self { min_ms, max_ms }
    }

    /// Check if a duration lies within the range
    pub fn contains(&self, ms: u32) -> bool {
        ms >= self.min_ms && ms <= self.max_ms
    }
}

/// Relative weights of the outcomes of a mood evaluation
///
/// Weights need not sum to one; a roll in `[0, 1)` is scaled by the total
/// and matched against cumulative bands in the order blink, happy, sleepy,
/// surprised.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventWeights {
    pub blink: f32,
    pub happy: f32,
    pub sleepy: f32,
    pub surprised: f32,
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            blink: 0.35,
            happy: 0.25,
            sleepy: 0.20,
            surprised: 0.20,
        }
    }
}

impl EventWeights {
    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.blink + self.happy + self.sleepy + self.surprised
    }

    /// Map a uniform roll in `[0, 1)` to an outcome
    ///
    /// Outcomes with zero weight are never returned, even when rounding
    /// pushes the roll past the last band edge.
    pub fn pick(&self, roll: f32) -> EvalOutcome {
        let bands = [
            (EvalOutcome::Blink, self.blink),
            (EvalOutcome::Mood(Mood::Happy), self.happy),
            (EvalOutcome::Mood(Mood::Sleepy), self.sleepy),
            (EvalOutcome::Mood(Mood::Surprised), self.surprised),
        ];
        let scaled = roll * self.total();

        let mut edge = 0.0;
        let mut last = EvalOutcome::Blink;
        for (outcome, weight) in bands {
            if weight <= 0.0 {
                continue;
            }
            edge += weight;
            last = outcome;
            if scaled < edge {
                return outcome;
            }
        }
        last
    }

    fn is_valid(&self) -> bool {
        let parts = [self.blink, self.happy, self.sleepy, self.surprised];
        // `!(w >= 0.0)` also rejects NaN
        if parts.iter().any(|w| !(*w >= 0.0)) {
            return false;
        }
        self.total() > 0.0
    }
}

/// Tunable mood policy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoodPolicy {
    /// Outcome weights for each evaluation
    pub weights: EventWeights,
    /// How long HAPPY lasts
    pub happy: DurationRange,
    /// How long SLEEPY lasts
    pub sleepy: DurationRange,
    /// How long SURPRISED lasts
    pub surprised: DurationRange,
    /// Chance that a due idle move is skipped while SLEEPY
    pub sleepy_still_chance: f32,
    /// Period of the SLEEPY sprite toggle
    pub sleepy_toggle_ms: u32,
}

impl Default for MoodPolicy {
    fn default() -> Self {
        Self {
            weights: EventWeights::default(),
            happy: DurationRange::new(1_500, 4_000),
            sleepy: DurationRange::new(2_000, 6_000),
            surprised: DurationRange::new(1_000, 2_500),
            sleepy_still_chance: 0.75,
            sleepy_toggle_ms: 667,
        }
    }
}

impl MoodPolicy {
    /// Duration range for a mood (`None` for DEFAULT, which has no duration)
    pub fn duration_range(&self, mood: Mood) -> Option<DurationRange> {
        match mood {
            Mood::Default => None,
            Mood::Happy => Some(self.happy),
            Mood::Sleepy => Some(self.sleepy),
            Mood::Surprised => Some(self.surprised),
        }
    }
}

/// Idle motion configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdleConfig {
    /// Whether the eyes drift on their own
    pub enabled: bool,
    /// Time between idle moves
    pub schedule: ScheduleConfig,
    /// Fraction of the remaining distance covered per tick
    pub tween_factor: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: ScheduleConfig::new(2_000, 2_000),
            tween_factor: 0.25,
        }
    }
}

/// Complete RoboEyes configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyesConfig {
    /// Eye sizes and spacing
    pub geometry: EyeGeometry,
    /// Duration of each blink animation frame
    pub blink_frame_ms: u32,
    /// Time between mood evaluations (added after the chosen action ends)
    pub expression_schedule: ScheduleConfig,
    /// Idle drift settings
    pub idle: IdleConfig,
    /// Mood weights and durations
    pub mood: MoodPolicy,
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            geometry: EyeGeometry::default(),
            blink_frame_ms: 70,
            expression_schedule: ScheduleConfig::new(5_000, 5_000),
            idle: IdleConfig::default(),
            mood: MoodPolicy::default(),
        }
    }
}

impl EyesConfig {
    /// Check the configuration for values the animation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        if g.width == 0 || g.height == 0 {
            return Err(ConfigError::InvalidEyeGeometry);
        }
        if g.width as usize > MAX_SPRITE_WIDTH || g.height as usize > MAX_SPRITE_HEIGHT {
            return Err(ConfigError::EyeTooLarge);
        }
        if self.blink_frame_ms == 0 {
            return Err(ConfigError::InvalidBlinkFrame);
        }

        let tween = self.idle.tween_factor;
        if !(tween > 0.0 && tween <= 1.0) {
            return Err(ConfigError::InvalidTweenFactor);
        }

        let policy = &self.mood;
        if !policy.weights.is_valid() {
            return Err(ConfigError::InvalidWeights);
        }
        if !(0.0..=1.0).contains(&policy.sleepy_still_chance) {
            return Err(ConfigError::InvalidProbability);
        }
        for range in [policy.happy, policy.sleepy, policy.surprised] {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::InvalidDurationRange);
            }
        }

        Ok(())
    }

    /// Check that a screen of the given size can host these eyes
    pub fn validate_screen(&self, width: u16, height: u16) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidScreen);
        }
        if width as usize > MAX_WIDTH || height as usize > MAX_HEIGHT {
            return Err(ConfigError::ScreenTooLarge);
        }
        Ok(())
    }
}
