//! Monotonic time source

use core::cell::Cell;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin; never decreases
    fn now_ms(&self) -> u64;
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute time
    ///
    /// Earlier times are ignored to keep the clock monotonic.
    pub fn set(&self, now_ms: u64) {
        if now_ms > self.now_ms.get() {
            self.now_ms.set(now_ms);
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
