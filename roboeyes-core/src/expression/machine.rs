//! Expression state machine definition
//!
//! Evaluated once per tick, in this order:
//!
//! 1. A timed mood that has run out reverts to DEFAULT (not while blinking).
//! 2. A running blink advances one frame if its frame time has come.
//! 3. In DEFAULT, not blinking, once the evaluation time is reached: roll
//!    once and either blink or start a mood, then re-arm the evaluation
//!    after the chosen action plus a random interval.

use heapless::Vec;
use rand::{Rng, RngCore};

use super::blink::BlinkAnimation;
use super::events::{EvalOutcome, ExpressionEvent};
use crate::config::EyesConfig;
use crate::schedule::ScheduleConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Most events a single tick can produce
pub const MAX_EXPRESSION_EVENTS: usize = 4;

/// Events produced by one tick
pub type ExpressionEvents = Vec<ExpressionEvent, MAX_EXPRESSION_EVENTS>;

/// Emotional expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mood {
    /// Resting state; no fixed duration
    #[default]
    Default,
    Happy,
    Sleepy,
    Surprised,
}

impl Mood {
    /// Check if this mood ends on its own
    pub fn is_timed(&self) -> bool {
        !matches!(self, Mood::Default)
    }

    /// Check if idle drift may run at all in this mood
    ///
    /// SLEEPY is allowed here but skips most moves at random.
    pub fn allows_idle_motion(&self) -> bool {
        !matches!(self, Mood::Surprised)
    }

    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Default => "default",
            Mood::Happy => "happy",
            Mood::Sleepy => "sleepy",
            Mood::Surprised => "surprised",
        }
    }
}

/// Mood and blink state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpressionMachine {
    mood: Mood,
    mood_started_ms: u64,
    mood_duration_ms: u32,
    next_eval_ms: u64,
    blink: BlinkAnimation,
}

impl ExpressionMachine {
    /// Create a machine in DEFAULT with the first evaluation at `first_eval_ms`
    pub fn new(first_eval_ms: u64) -> Self {
        Self {
            mood: Mood::Default,
            mood_started_ms: 0,
            mood_duration_ms: 0,
            next_eval_ms: first_eval_ms,
            blink: BlinkAnimation::new(),
        }
    }

    /// Run one tick of the state machine
    pub fn update<R: RngCore>(
        &mut self,
        now_ms: u64,
        config: &EyesConfig,
        rng: &mut R,
    ) -> ExpressionEvents {
        let mut events = ExpressionEvents::new();

        if self.mood.is_timed() && !self.blink.is_active() && now_ms >= self.mood_end_ms() {
            let expired = self.mood;
            self.mood = Mood::Default;
            let _ = events.push(ExpressionEvent::MoodExpired(expired));
        }

        if self.blink.advance(now_ms, config.blink_frame_ms) {
            let _ = events.push(ExpressionEvent::BlinkFinished);
        }

        if self.mood == Mood::Default && !self.blink.is_active() && now_ms >= self.next_eval_ms {
            let _ = events.push(self.evaluate(now_ms, config, rng));
        }

        events
    }

    /// Roll for the next action and re-arm the evaluation
    fn evaluate<R: RngCore>(
        &mut self,
        now_ms: u64,
        config: &EyesConfig,
        rng: &mut R,
    ) -> ExpressionEvent {
        let roll: f32 = rng.random();
        let (event, busy_ms) = match config.mood.weights.pick(roll) {
            EvalOutcome::Blink => {
                self.blink.start(now_ms);
                (
                    ExpressionEvent::BlinkStarted,
                    BlinkAnimation::total_duration_ms(config.blink_frame_ms),
                )
            }
            EvalOutcome::Mood(mood) => {
                let duration_ms = match config.mood.duration_range(mood) {
                    Some(range) => rng.random_range(range.min_ms..=range.max_ms),
                    None => 0,
                };
                self.enter_mood(mood, duration_ms, now_ms);
                (ExpressionEvent::MoodStarted { mood, duration_ms }, duration_ms)
            }
        };

        self.next_eval_ms = config.expression_schedule.next_after(now_ms, busy_ms, rng);
        event
    }

    fn enter_mood(&mut self, mood: Mood, duration_ms: u32, now_ms: u64) {
        self.mood = mood;
        self.mood_started_ms = now_ms;
        self.mood_duration_ms = duration_ms;
    }

    /// Force a mood now, bypassing the random roll
    ///
    /// Forcing DEFAULT ends the current mood. The next evaluation is
    /// re-armed to come after the forced mood.
    pub fn set_mood<R: RngCore>(
        &mut self,
        mood: Mood,
        duration_ms: u32,
        now_ms: u64,
        schedule: &ScheduleConfig,
        rng: &mut R,
    ) -> Option<ExpressionEvent> {
        let previous = self.mood;
        let duration_ms = if mood.is_timed() { duration_ms } else { 0 };
        self.enter_mood(mood, duration_ms, now_ms);
        self.next_eval_ms = schedule.next_after(now_ms, duration_ms, rng);

        if mood.is_timed() {
            Some(ExpressionEvent::MoodStarted { mood, duration_ms })
        } else if previous.is_timed() {
            Some(ExpressionEvent::MoodExpired(previous))
        } else {
            None
        }
    }

    /// Start a blink now unless one is already running
    ///
    /// Frame 0 is held for a full `frame_ms` so the next tick draws it.
    pub fn trigger_blink(&mut self, now_ms: u64, frame_ms: u32) -> Option<ExpressionEvent> {
        if self.blink.start(now_ms + frame_ms as u64) {
            Some(ExpressionEvent::BlinkStarted)
        } else {
            None
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn mood_started_ms(&self) -> u64 {
        self.mood_started_ms
    }

    pub fn mood_duration_ms(&self) -> u32 {
        self.mood_duration_ms
    }

    fn mood_end_ms(&self) -> u64 {
        self.mood_started_ms + self.mood_duration_ms as u64
    }

    /// Time left in the current timed mood
    pub fn mood_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.mood.is_timed() {
            Some(self.mood_end_ms().saturating_sub(now_ms))
        } else {
            None
        }
    }

    pub fn next_eval_ms(&self) -> u64 {
        self.next_eval_ms
    }

    pub fn blink(&self) -> &BlinkAnimation {
        &self.blink
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EventWeights;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn config_with(weights: EventWeights) -> EyesConfig {
        let mut config = EyesConfig::default();
        config.mood.weights = weights;
        config.blink_frame_ms = 75;
        config
    }

    fn only(outcome: EvalOutcome) -> EventWeights {
        let mut w = EventWeights {
            blink: 0.0,
            happy: 0.0,
            sleepy: 0.0,
            surprised: 0.0,
        };
        match outcome {
            EvalOutcome::Blink => w.blink = 1.0,
            EvalOutcome::Mood(Mood::Happy) => w.happy = 1.0,
            EvalOutcome::Mood(Mood::Sleepy) => w.sleepy = 1.0,
            EvalOutcome::Mood(_) => w.surprised = 1.0,
        }
        w
    }

    #[test]
    fn test_nothing_before_first_eval() {
        let config = EyesConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut machine = ExpressionMachine::new(5_000);

        let events = machine.update(4_999, &config, &mut rng);
        assert!(events.is_empty());
        assert_eq!(machine.mood(), Mood::Default);
        assert!(!machine.is_blinking());
    }

    #[test]
    fn test_blink_frames_follow_time() {
        let config = config_with(only(EvalOutcome::Blink));
        let mut rng = SmallRng::seed_from_u64(3);
        let mut machine = ExpressionMachine::new(1_000);
        let t0 = 1_000;

        let events = machine.update(t0, &config, &mut rng);
        assert_eq!(events.as_slice(), &[ExpressionEvent::BlinkStarted]);

        for k in 0..5u64 {
            if k > 0 {
                machine.update(t0 + 75 * k, &config, &mut rng);
            }
            assert!(machine.is_blinking());
            assert_eq!(machine.blink().frame(), k as usize);
        }

        let events = machine.update(t0 + 375, &config, &mut rng);
        assert_eq!(events.as_slice(), &[ExpressionEvent::BlinkFinished]);
        assert!(!machine.is_blinking());
        assert_eq!(machine.blink().frame(), 0);
        assert_eq!(machine.mood(), Mood::Default);
    }

    #[test]
    fn test_blink_reschedule_accounts_for_animation() {
        let mut config = config_with(only(EvalOutcome::Blink));
        config.expression_schedule = ScheduleConfig::new(5_000, 0);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut machine = ExpressionMachine::new(0);

        machine.update(0, &config, &mut rng);
        assert_eq!(machine.next_eval_ms(), 4 * 75 + 5_000);
    }

    #[test]
    fn test_mood_duration_within_range() {
        let config = config_with(only(EvalOutcome::Mood(Mood::Happy)));
        let mut rng = SmallRng::seed_from_u64(11);

        for start in 0..50u64 {
            let mut machine = ExpressionMachine::new(start);
            let events = machine.update(start, &config, &mut rng);

            assert_eq!(machine.mood(), Mood::Happy);
            assert_eq!(machine.mood_started_ms(), start);
            assert!(config.mood.happy.contains(machine.mood_duration_ms()));
            assert_eq!(
                events.as_slice(),
                &[ExpressionEvent::MoodStarted {
                    mood: Mood::Happy,
                    duration_ms: machine.mood_duration_ms()
                }]
            );

            // Next evaluation comes after the mood ends
            let earliest = start + machine.mood_duration_ms() as u64 + 5_000;
            assert!(machine.next_eval_ms() >= earliest);
            assert!(machine.next_eval_ms() <= earliest + 5_000);
        }
    }

    #[test]
    fn test_forced_sleepy_expires() {
        let config = EyesConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut machine = ExpressionMachine::new(0);
        let t0 = 10_000;

        let event = machine.set_mood(Mood::Sleepy, 3_000, t0, &config.expression_schedule, &mut rng);
        assert_eq!(
            event,
            Some(ExpressionEvent::MoodStarted {
                mood: Mood::Sleepy,
                duration_ms: 3_000
            })
        );

        machine.update(t0 + 2_900, &config, &mut rng);
        assert_eq!(machine.mood(), Mood::Sleepy);
        assert_eq!(machine.mood_remaining_ms(t0 + 2_900), Some(100));

        let events = machine.update(t0 + 3_100, &config, &mut rng);
        assert_eq!(machine.mood(), Mood::Default);
        assert_eq!(events.as_slice(), &[ExpressionEvent::MoodExpired(Mood::Sleepy)]);
        assert_eq!(machine.mood_remaining_ms(t0 + 3_100), None);
    }

    #[test]
    fn test_no_new_mood_while_mood_active() {
        let config = config_with(only(EvalOutcome::Mood(Mood::Surprised)));
        let mut rng = SmallRng::seed_from_u64(9);
        let mut machine = ExpressionMachine::new(0);

        machine.set_mood(Mood::Happy, 3_000, 0, &ScheduleConfig::new(0, 0), &mut rng);
        // Evaluation is due, but HAPPY still holds
        for now in (0..3_000).step_by(100) {
            let events = machine.update(now, &config, &mut rng);
            assert!(events.is_empty());
            assert_eq!(machine.mood(), Mood::Happy);
        }
    }

    #[test]
    fn test_no_new_mood_while_blinking() {
        let config = config_with(only(EvalOutcome::Mood(Mood::Happy)));
        let mut rng = SmallRng::seed_from_u64(9);
        let mut machine = ExpressionMachine::new(0);

        machine.trigger_blink(0, config.blink_frame_ms);
        for now in [75, 150, 225, 300] {
            machine.update(now, &config, &mut rng);
            assert!(machine.is_blinking());
            assert_eq!(machine.mood(), Mood::Default);
        }

        // Blink ends at 375 and the overdue evaluation fires on the same tick
        let events = machine.update(375, &config, &mut rng);
        assert_eq!(events[0], ExpressionEvent::BlinkFinished);
        assert_eq!(machine.mood(), Mood::Happy);
    }

    #[test]
    fn test_expiry_waits_for_blink() {
        let config = config_with(only(EvalOutcome::Blink));
        let mut rng = SmallRng::seed_from_u64(2);
        let mut machine = ExpressionMachine::new(0);

        machine.set_mood(Mood::Happy, 100, 0, &config.expression_schedule, &mut rng);
        machine.trigger_blink(50, config.blink_frame_ms);

        // Mood is over but a blink is running
        machine.update(150, &config, &mut rng);
        assert_eq!(machine.mood(), Mood::Happy);

        while machine.is_blinking() {
            let now = 150 + 75 * machine.blink().frame() as u64;
            machine.update(now, &config, &mut rng);
        }
        machine.update(1_000, &config, &mut rng);
        assert_eq!(machine.mood(), Mood::Default);
    }

    #[test]
    fn test_forced_default_ends_mood() {
        let config = EyesConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut machine = ExpressionMachine::new(0);

        machine.set_mood(Mood::Surprised, 2_000, 0, &config.expression_schedule, &mut rng);
        let event = machine.set_mood(Mood::Default, 9_999, 500, &config.expression_schedule, &mut rng);

        assert_eq!(event, Some(ExpressionEvent::MoodExpired(Mood::Surprised)));
        assert_eq!(machine.mood(), Mood::Default);
        assert_eq!(machine.mood_duration_ms(), 0);
        assert!(machine.next_eval_ms() >= 5_500);
    }

    #[test]
    fn test_trigger_blink_only_once() {
        let mut machine = ExpressionMachine::new(0);
        assert_eq!(machine.trigger_blink(10, 75), Some(ExpressionEvent::BlinkStarted));
        assert_eq!(machine.trigger_blink(20, 75), None);
    }

    #[test]
    fn test_triggered_blink_shows_every_frame() {
        let config = config_with(only(EvalOutcome::Mood(Mood::Happy)));
        let mut rng = SmallRng::seed_from_u64(4);
        let mut machine = ExpressionMachine::new(u64::MAX);
        let t0 = 2_000;

        machine.trigger_blink(t0, config.blink_frame_ms);
        for k in 0..5u64 {
            machine.update(t0 + 75 * k, &config, &mut rng);
            assert!(machine.is_blinking());
            assert_eq!(machine.blink().frame(), k as usize);
        }

        let events = machine.update(t0 + 375, &config, &mut rng);
        assert_eq!(events.as_slice(), &[ExpressionEvent::BlinkFinished]);
        assert_eq!(machine.blink().frame(), 0);
    }

    #[test]
    fn test_long_blink_frames_do_not_overflow() {
        let mut config = config_with(only(EvalOutcome::Blink));
        config.blink_frame_ms = u32::MAX / 2;
        config.expression_schedule = ScheduleConfig::new(10, 0);
        assert_eq!(config.validate(), Ok(()));

        let mut rng = SmallRng::seed_from_u64(8);
        let mut machine = ExpressionMachine::new(10);

        let events = machine.update(10, &config, &mut rng);
        assert_eq!(events.as_slice(), &[ExpressionEvent::BlinkStarted]);
        assert_eq!(machine.next_eval_ms(), 10 + u32::MAX as u64 + 10);
    }

    #[test]
    fn test_default_weights_reach_every_outcome() {
        let config = EyesConfig::default();
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut blinks = 0;
        let mut moods = [0u32; 3];

        for _ in 0..400 {
            let mut machine = ExpressionMachine::new(0);
            match machine.update(0, &config, &mut rng).first() {
                Some(ExpressionEvent::BlinkStarted) => blinks += 1,
                Some(ExpressionEvent::MoodStarted { mood: Mood::Happy, .. }) => moods[0] += 1,
                Some(ExpressionEvent::MoodStarted { mood: Mood::Sleepy, .. }) => moods[1] += 1,
                Some(ExpressionEvent::MoodStarted { mood: Mood::Surprised, .. }) => moods[2] += 1,
                other => panic!("unexpected event {:?}", other),
            }
        }

        assert!(blinks > 0);
        assert!(moods.iter().all(|n| *n > 0));
    }

    #[test]
    fn test_mood_flags() {
        assert!(!Mood::Default.is_timed());
        assert!(Mood::Sleepy.is_timed());
        assert!(!Mood::Surprised.allows_idle_motion());
        assert!(Mood::Sleepy.allows_idle_motion());
        assert_eq!(Mood::Happy.as_str(), "happy");
    }
}
