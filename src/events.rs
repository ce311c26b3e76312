//! Interrupt-driven tick signalling.
//!
//! The periodic hardware timer raises a tick; the main loop consumes it and
//! runs one tick body to completion. Ticks never queue up: a tick raised
//! while the previous one is still pending is dropped and counted.
//!
//! ```text
//! ┌─────────────┐  raise()  ┌──────────────┐  take()  ┌──────────────┐
//! │ Timer task  │──────────▶│  TickSignal  │─────────▶│  Main loop   │
//! │ (esp_timer) │           │ (lock-free)  │          │ (tick body)  │
//! └─────────────┘           └──────────────┘          └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-slot, coalescing tick flag.
pub struct TickSignal {
    pending: AtomicBool,
    dropped: AtomicU32,
}

/// The node's tick signal, raised by [`crate::drivers::hw_timer`].
pub static TICK: TickSignal = TickSignal::new();

impl TickSignal {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            dropped: AtomicU32::new(0),
        }
    }

    /// Raise a tick. Safe from timer-task / ISR context.
    /// Returns `false` if a tick was already pending (this one is dropped).
    pub fn raise(&self) -> bool {
        if self.pending.swap(true, Ordering::AcqRel) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Consume the pending tick, if any. Main loop only.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Ticks dropped because the consumer had not caught up.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}
