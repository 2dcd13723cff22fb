//! Fixed-rate tick deadlines
//!
//! Deadlines advance by exactly one interval from the previous deadline so
//! small delays do not accumulate. After a long stall the pacer snaps to the
//! present instead of replaying the missed ticks.

/// Deadline generator for the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramePacer {
    interval_ms: u32,
    last_target_ms: u64,
}

impl FramePacer {
    /// Pacer for `frame_rate` ticks per second, starting at `now_ms`
    ///
    /// A zero frame rate is treated as one tick per second.
    pub fn new(frame_rate: u32, now_ms: u64) -> Self {
        Self {
            interval_ms: (1_000 / frame_rate.max(1)).max(1),
            last_target_ms: now_ms,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Deadline of the next tick
    ///
    /// If `now_ms` is already more than 1.5 intervals past the deadline the
    /// schedule restarts from `now_ms`.
    pub fn next_deadline(&mut self, now_ms: u64) -> u64 {
        let target = self.last_target_ms + self.interval_ms as u64;
        let slack = self.interval_ms as u64 * 3 / 2;

        if now_ms > target && now_ms - target > slack {
            self.last_target_ms = now_ms;
        } else {
            self.last_target_ms = target;
        }
        target
    }

    /// Grid point the next deadline is measured from
    pub fn last_target_ms(&self) -> u64 {
        self.last_target_ms
    }
}
