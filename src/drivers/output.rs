//! Binary output driver (LED, relay, fan enable…).
//!
//! Generic over any `embedded_hal` output pin. Pin errors are logged and
//! the cached level is left unchanged, so the next write retries.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct OutputDriver<P> {
    pin: P,
    level: Option<bool>,
}

impl<P: OutputPin> OutputDriver<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, level: None }
    }

    /// Drive the pin. Writing the current level again is harmless.
    pub fn set(&mut self, on: bool) {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.level = Some(on),
            Err(e) => warn!("Output: pin write failed ({:?})", e),
        }
    }

    /// Last level successfully written.
    pub fn level(&self) -> Option<bool> {
        self.level
    }
}
