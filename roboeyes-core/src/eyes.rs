//! RoboEyes: the owned animation state
//!
//! [`RoboEyes`] ties the expression machine, the idle controller and the
//! compositor together. It owns the frame buffer, the sprites, the random
//! source and the clock; the caller only ticks it and presents the frame.

use heapless::Vec;
use rand::RngCore;

use crate::compositor::{compose, select_sprite};
use crate::config::{ConfigError, EyesConfig};
use crate::expression::{ExpressionEvent, ExpressionMachine, Mood};
use crate::framebuffer::{FrameBuffer, Palette};
use crate::motion::{EyePair, IdleMotion};
use crate::schedule::ScheduleConfig;
use crate::sprite::{SpriteId, SpriteSet};
use crate::traits::Clock;

/// Most events a single tick can produce
pub const MAX_EYES_EVENTS: usize = 5;

/// Something that changed during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EyesEvent {
    /// Mood or blink transition
    Expression(ExpressionEvent),
    /// Idle motion picked new targets
    IdleRetarget(EyePair),
}

/// Events produced by one tick
pub type EyesEvents = Vec<EyesEvent, MAX_EYES_EVENTS>;

/// Snapshot for status reporting
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyesStatus {
    pub mood: Mood,
    /// Time left in a timed mood
    pub mood_remaining_ms: Option<u64>,
    pub blinking: bool,
    pub blink_frame: usize,
    pub sprite: SpriteId,
    /// Rounded top-left corners of the eye slots
    pub left: (i32, i32),
    pub right: (i32, i32),
    pub idle_enabled: bool,
    pub next_eval_ms: u64,
}

/// Animated robot eyes
pub struct RoboEyes<R: RngCore, C: Clock> {
    config: EyesConfig,
    frame_rate: u32,
    rng: R,
    clock: C,
    sprites: SpriteSet,
    expression: ExpressionMachine,
    idle: IdleMotion,
    frame: FrameBuffer,
    palette: Palette,
    sprite: SpriteId,
}

impl<R: RngCore, C: Clock> RoboEyes<R, C> {
    /// Validate the configuration, render the sprites and place the eyes
    ///
    /// The first mood evaluation and idle move are scheduled from the
    /// clock's current time. The frame buffer already holds the resting
    /// frame when this returns.
    pub fn begin(
        config: EyesConfig,
        width: u16,
        height: u16,
        frame_rate: u32,
        mut rng: R,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_screen(width, height)?;
        if frame_rate == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }

        let now_ms = clock.now_ms();
        let first_eval_ms = config.expression_schedule.next_after(now_ms, 0, &mut rng);
        let idle = IdleMotion::new(config.geometry, width, height, &config.idle, now_ms, &mut rng);

        let mut eyes = Self {
            sprites: SpriteSet::build(&config.geometry),
            expression: ExpressionMachine::new(first_eval_ms),
            idle,
            frame: FrameBuffer::new(width, height),
            palette: Palette::default(),
            sprite: SpriteId::Open,
            config,
            frame_rate,
            rng,
            clock,
        };
        eyes.redraw(now_ms);
        Ok(eyes)
    }

    /// Advance one tick at the clock's current time
    pub fn update(&mut self) -> EyesEvents {
        let now_ms = self.clock.now_ms();
        self.update_at(now_ms)
    }

    /// Advance one tick at `now_ms`
    ///
    /// Runs the expression machine, then the idle controller, then one
    /// smoothing step, and redraws the frame.
    pub fn update_at(&mut self, now_ms: u64) -> EyesEvents {
        let mut events = EyesEvents::new();

        for event in self.expression.update(now_ms, &self.config, &mut self.rng) {
            let _ = events.push(EyesEvent::Expression(event));
        }

        let retargeted = self.idle.update(
            now_ms,
            self.expression.mood(),
            self.expression.is_blinking(),
            &self.config.mood,
            &mut self.rng,
        );
        if retargeted {
            let _ = events.push(EyesEvent::IdleRetarget(*self.idle.target()));
        }

        self.idle.smooth(self.config.idle.tween_factor);
        self.redraw(now_ms);
        events
    }

    fn redraw(&mut self, now_ms: u64) {
        self.sprite = select_sprite(
            self.expression.mood(),
            self.expression.blink(),
            now_ms,
            self.config.mood.sleepy_toggle_ms,
        );
        compose(
            &mut self.frame,
            &self.sprites,
            self.sprite,
            self.idle.current(),
            self.config.geometry.height,
        );
    }

    /// Force a mood for `duration_ms` starting now
    ///
    /// `Mood::Default` ends the current mood instead. Takes effect on the
    /// next tick.
    pub fn set_mood(&mut self, mood: Mood, duration_ms: u32) -> Option<ExpressionEvent> {
        let now_ms = self.clock.now_ms();
        self.expression
            .set_mood(mood, duration_ms, now_ms, &self.config.expression_schedule, &mut self.rng)
    }

    /// Start a blink on the next tick unless one is already running
    pub fn blink(&mut self) -> bool {
        let now_ms = self.clock.now_ms();
        self.expression
            .trigger_blink(now_ms, self.config.blink_frame_ms)
            .is_some()
    }

    /// Turn idle drift on or off and change its interval
    ///
    /// The new interval applies from the next move on. Disabling keeps the
    /// current target, so the eyes settle where they were heading.
    pub fn set_idle_mode(&mut self, enabled: bool, schedule: ScheduleConfig) {
        self.config.idle.enabled = enabled;
        self.config.idle.schedule = schedule;
        self.idle.set_enabled(enabled);
        self.idle.set_schedule(schedule);
    }

    /// Frame drawn by the last tick
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Change how logical pixels map to the panel
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn mood(&self) -> Mood {
        self.expression.mood()
    }

    pub fn is_blinking(&self) -> bool {
        self.expression.is_blinking()
    }

    pub fn blink_frame(&self) -> usize {
        self.expression.blink().frame()
    }

    /// Sprite shown in the last frame
    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    /// Smoothed eye positions
    pub fn positions(&self) -> &EyePair {
        self.idle.current()
    }

    /// Positions the eyes are moving toward
    pub fn targets(&self) -> &EyePair {
        self.idle.target()
    }

    pub fn config(&self) -> &EyesConfig {
        &self.config
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn frame_interval_ms(&self) -> u32 {
        1_000 / self.frame_rate
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn status(&self) -> EyesStatus {
        let now_ms = self.clock.now_ms();
        let positions = self.idle.current();
        EyesStatus {
            mood: self.expression.mood(),
            mood_remaining_ms: self.expression.mood_remaining_ms(now_ms),
            blinking: self.expression.is_blinking(),
            blink_frame: self.expression.blink().frame(),
            sprite: self.sprite,
            left: positions.left.rounded(),
            right: positions.right.rounded(),
            idle_enabled: self.idle.is_enabled(),
            next_eval_ms: self.expression.next_eval_ms(),
        }
    }
}
