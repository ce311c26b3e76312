//! Threshold actuation controller
//!
//! Compares the live average against a fixed threshold and drives a single
//! binary output. No hysteresis: the comparison is a strict `>` on every
//! call. With no data the output is left exactly as it was.

use crate::app::ports::OutputPort;

/// What [`ThresholdController::apply`] did to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    /// No average available; output untouched.
    Held,
    /// Output written. `changed` is false when the level was already set.
    Applied { on: bool, changed: bool },
}

/// Threshold controller
pub struct ThresholdController {
    threshold: f32,
    last_applied: Option<bool>,
}

impl ThresholdController {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last_applied: None,
        }
    }

    /// Drive the output OFF once at boot, before any data arrives.
    pub fn initialise(&mut self, output: &mut impl OutputPort) {
        output.set_output(false);
        self.last_applied = Some(false);
    }

    /// Apply the threshold to `average` and write the result.
    ///
    /// The write happens on every call with data, even when the level is
    /// unchanged; the output port is idempotent.
    pub fn apply(&mut self, average: Option<f32>, output: &mut impl OutputPort) -> Actuation {
        let Some(avg) = average else {
            return Actuation::Held;
        };
        let on = avg > self.threshold;
        output.set_output(on);
        let changed = self.last_applied != Some(on);
        self.last_applied = Some(on);
        Actuation::Applied { on, changed }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Last level written, `None` before the first write.
    pub fn last_applied(&self) -> Option<bool> {
        self.last_applied
    }
}
