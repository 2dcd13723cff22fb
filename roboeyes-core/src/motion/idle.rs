//! Idle motion controller
//!
//! Picks a random offset every few seconds, applies it to both eyes'
//! resting positions and clamps each eye into its own legal box. The left
//! box leaves room for the right eye; the right box starts past the left
//! eye's new target plus the spacing, so the eyes never overlap.

use rand::{Rng, RngCore};

use super::position::{EyePair, EyePosition};
use crate::config::{EyeGeometry, IdleConfig, MoodPolicy};
use crate::expression::Mood;
use crate::schedule::ScheduleConfig;

/// Area an eye's top-left corner may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LegalBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl LegalBox {
    /// Clamp a position into the box
    ///
    /// A max below its min collapses onto the min.
    pub fn constrain(&self, pos: EyePosition) -> EyePosition {
        EyePosition::new(
            constrain(pos.x, self.min_x, self.max_x),
            constrain(pos.y, self.min_y, self.max_y),
        )
    }

    /// Check if a position lies in the box
    pub fn contains(&self, pos: EyePosition) -> bool {
        pos.x >= self.min_x
            && pos.x <= self.max_x.max(self.min_x)
            && pos.y >= self.min_y
            && pos.y <= self.max_y.max(self.min_y)
    }
}

fn constrain(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max.max(min))
}

/// Idle drift state for both eyes
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleMotion {
    geometry: EyeGeometry,
    screen_width: u16,
    screen_height: u16,
    defaults: EyePair,
    target: EyePair,
    current: EyePair,
    enabled: bool,
    schedule: ScheduleConfig,
    next_move_ms: u64,
}

impl IdleMotion {
    /// Place both eyes at rest and arm the first move
    pub fn new<R: RngCore>(
        geometry: EyeGeometry,
        screen_width: u16,
        screen_height: u16,
        idle: &IdleConfig,
        now_ms: u64,
        rng: &mut R,
    ) -> Self {
        let defaults = Self::default_positions(&geometry, screen_width, screen_height);
        Self {
            geometry,
            screen_width,
            screen_height,
            defaults,
            target: defaults,
            current: defaults,
            enabled: idle.enabled,
            schedule: idle.schedule,
            next_move_ms: idle.schedule.next_after(now_ms, 0, rng),
        }
    }

    /// Resting positions: the pair is centred on screen
    pub fn default_positions(geometry: &EyeGeometry, screen_width: u16, screen_height: u16) -> EyePair {
        let w = geometry.width as i32;
        let h = geometry.height as i32;
        let total_width = 2 * w + geometry.spacing as i32;

        let left_x = (screen_width as i32 - total_width).div_euclid(2);
        let y = (screen_height as i32 - h).div_euclid(2);
        let right_x = left_x + w + geometry.spacing as i32;

        EyePair::new(
            EyePosition::new(left_x as f32, y as f32),
            EyePosition::new(right_x as f32, y as f32),
        )
    }

    fn vertical_range(&self) -> (f32, f32) {
        let margin = self.geometry.edge_margin as f32;
        let max_y = self.screen_height as f32 - self.geometry.height as f32 - margin;
        (margin, max_y)
    }

    /// Legal box of the left eye
    pub fn left_box(&self) -> LegalBox {
        let g = &self.geometry;
        let margin = g.edge_margin as f32;
        let (min_y, max_y) = self.vertical_range();
        LegalBox {
            min_x: margin,
            max_x: self.screen_width as f32
                - 2.0 * g.width as f32
                - g.spacing as f32
                - margin,
            min_y,
            max_y,
        }
    }

    /// Legal box of the right eye given the left eye's target x
    pub fn right_box(&self, left_x: f32) -> LegalBox {
        let g = &self.geometry;
        let (min_y, max_y) = self.vertical_range();
        LegalBox {
            min_x: left_x + g.width as f32 + g.spacing as f32,
            max_x: self.screen_width as f32 - g.width as f32 - g.edge_margin as f32,
            min_y,
            max_y,
        }
    }

    /// Largest offset an idle move may pick in this mood
    pub fn max_offset(&self, mood: Mood) -> (i32, i32) {
        let mut max_x = self.geometry.width as i32 / 3;
        let mut max_y = self.geometry.height as i32 / 4;
        if mood == Mood::Sleepy {
            max_x /= 2;
            max_y /= 2;
        }
        (max_x, max_y)
    }

    /// Pick a new target if a move is due and allowed
    ///
    /// Returns true if the target changed.
    pub fn update<R: RngCore>(
        &mut self,
        now_ms: u64,
        mood: Mood,
        blinking: bool,
        policy: &MoodPolicy,
        rng: &mut R,
    ) -> bool {
        if !self.enabled || blinking || !mood.allows_idle_motion() || now_ms < self.next_move_ms {
            return false;
        }
        if mood == Mood::Sleepy && rng.random::<f32>() < policy.sleepy_still_chance {
            return false;
        }

        let (max_x, max_y) = self.max_offset(mood);
        let offset_x = random_offset(max_x, rng);
        let offset_y = random_offset(max_y, rng);
        self.retarget(offset_x, offset_y);
        self.next_move_ms = self.schedule.next_after(now_ms, 0, rng);
        true
    }

    /// Shift both eyes' resting positions by one offset and clamp
    pub fn retarget(&mut self, offset_x: f32, offset_y: f32) {
        let left = EyePosition::new(
            self.defaults.left.x + offset_x,
            self.defaults.left.y + offset_y,
        );
        let right = EyePosition::new(
            self.defaults.right.x + offset_x,
            self.defaults.right.y + offset_y,
        );

        let left = self.left_box().constrain(left);
        let right = self.right_box(left.x).constrain(right);
        self.target = EyePair::new(left, right);
    }

    /// One smoothing step toward the target
    pub fn smooth(&mut self, factor: f32) {
        self.current.approach(&self.target, factor);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change the move interval; takes effect after the next move
    pub fn set_schedule(&mut self, schedule: ScheduleConfig) {
        self.schedule = schedule;
    }

    pub fn defaults(&self) -> &EyePair {
        &self.defaults
    }

    pub fn target(&self) -> &EyePair {
        &self.target
    }

    pub fn current(&self) -> &EyePair {
        &self.current
    }

    pub fn next_move_ms(&self) -> u64 {
        self.next_move_ms
    }
}

fn random_offset<R: RngCore>(max: i32, rng: &mut R) -> f32 {
    if max <= 0 {
        return 0.0;
    }
    let max = max as f32;
    rng.random_range(-max..=max)
}
