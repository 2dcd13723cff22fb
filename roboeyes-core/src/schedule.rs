//! Randomized re-arming of periodic evaluations
//!
//! Both the mood evaluation and the idle motion fire at
//! `base + uniform(0, variation)` after their previous run.

use rand::{Rng, RngCore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base interval plus uniform jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleConfig {
    /// Minimum delay in milliseconds
    pub base_ms: u32,
    /// Maximum extra random delay in milliseconds
    pub variation_ms: u32,
}

impl ScheduleConfig {
    pub const fn new(base_ms: u32, variation_ms: u32) -> Self {
        Self {
            base_ms,
            variation_ms,
        }
    }

    /// Draw a delay in `[base, base + variation]`
    pub fn delay_ms<R: RngCore>(&self, rng: &mut R) -> u32 {
        let jitter = if self.variation_ms == 0 {
            0
        } else {
            rng.random_range(0..=self.variation_ms)
        };
        self.base_ms.saturating_add(jitter)
    }

    /// Next firing time after `now_ms`, with `extra_ms` of busy time first
    pub fn next_after<R: RngCore>(&self, now_ms: u64, extra_ms: u32, rng: &mut R) -> u64 {
        now_ms + extra_ms as u64 + self.delay_ms(rng) as u64
    }
}
