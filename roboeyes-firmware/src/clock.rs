//! Embassy-backed clock

use embassy_time::Instant;
use roboeyes_core::traits::Clock;

/// Milliseconds since boot from the embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
