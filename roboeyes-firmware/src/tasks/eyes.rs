//! Eyes task
//!
//! Ticks the animation at the target frame rate and pushes every finished
//! frame to the panel. Deadlines come from a [`FramePacer`], so a slow
//! frame delays the next one without shifting the whole schedule.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Instant, Timer};
use rand::rngs::SmallRng;
use roboeyes_core::expression::ExpressionEvent;
use roboeyes_core::pacing::FramePacer;
use roboeyes_core::{EyeDisplay, EyesEvent, RoboEyes};
use roboeyes_drivers::display::Ssd1306;

use crate::clock::EmbassyClock;
use crate::config::STATUS_INTERVAL_MS;

/// Panel driver on the board's I2C bus
pub type EyesDisplay = Ssd1306<I2c<'static, I2C0, Async>>;

/// Animation state as built by the firmware
pub type FirmwareEyes = RoboEyes<SmallRng, EmbassyClock>;

/// Eyes task - tick, present, sleep until the next deadline
#[embassy_executor::task]
pub async fn eyes_task(mut display: EyesDisplay, mut eyes: FirmwareEyes) {
    info!("Eyes task started");

    let mut pacer = FramePacer::new(eyes.frame_rate(), eyes.now_ms());
    let mut next_status_ms = eyes.now_ms() + STATUS_INTERVAL_MS;
    let mut present_errors: u32 = 0;

    loop {
        for event in eyes.update() {
            log_event(&event);
        }

        match display.present(eyes.frame(), eyes.palette()).await {
            Ok(()) => {
                if present_errors > 0 {
                    info!("Display recovered after {} failed frames", present_errors);
                    present_errors = 0;
                }
            }
            Err(e) => {
                if present_errors == 0 {
                    warn!("Frame not presented: {}", e);
                }
                present_errors = present_errors.saturating_add(1);
            }
        }

        let now_ms = eyes.now_ms();
        if now_ms >= next_status_ms {
            let status = eyes.status();
            debug!(
                "mood={} blink={}/{} left=({},{}) right=({},{}) next_eval={}",
                status.mood.as_str(),
                status.blinking,
                status.blink_frame,
                status.left.0,
                status.left.1,
                status.right.0,
                status.right.1,
                status.next_eval_ms
            );
            next_status_ms = now_ms + STATUS_INTERVAL_MS;
        }

        let deadline = pacer.next_deadline(now_ms);
        if pacer.last_target_ms() != deadline {
            trace!("Tick overran, resyncing at {} ms", now_ms);
        }
        Timer::at(Instant::from_millis(deadline)).await;
    }
}

fn log_event(event: &EyesEvent) {
    match event {
        EyesEvent::Expression(ExpressionEvent::MoodStarted { mood, duration_ms }) => {
            info!("Mood {} for {} ms", mood.as_str(), duration_ms);
        }
        EyesEvent::Expression(ExpressionEvent::MoodExpired(mood)) => {
            info!("Mood {} ended", mood.as_str());
        }
        EyesEvent::Expression(ExpressionEvent::BlinkStarted) => {
            debug!("Blink");
        }
        EyesEvent::Expression(ExpressionEvent::BlinkFinished) => {
            trace!("Blink done");
        }
        EyesEvent::IdleRetarget(target) => {
            let (lx, ly) = target.left.rounded();
            let (rx, ry) = target.right.rounded();
            trace!("Idle target left=({},{}) right=({},{})", lx, ly, rx, ry);
        }
    }
}
