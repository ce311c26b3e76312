//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! [`TemperatureAdapter`] exposes the analog sensor through
//! [`SensorPort`]; [`OutputAdapter`] exposes any digital output pin
//! through [`OutputPort`]. On non-espidf targets the underlying drivers
//! use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{OutputPort, SensorPort};
use crate::drivers::output::OutputDriver;
use crate::error::SensorError;
use crate::sensors::temperature::TemperatureSensor;

// ── SensorPort implementation ─────────────────────────────────

pub struct TemperatureAdapter {
    sensor: TemperatureSensor,
}

impl TemperatureAdapter {
    pub fn new(sensor: TemperatureSensor) -> Self {
        Self { sensor }
    }
}

impl SensorPort for TemperatureAdapter {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensor.read().map(|r| r.celsius)
    }
}

// ── OutputPort implementation ─────────────────────────────────

pub struct OutputAdapter<P> {
    driver: OutputDriver<P>,
}

impl<P: OutputPin> OutputAdapter<P> {
    pub fn new(pin: P) -> Self {
        Self {
            driver: OutputDriver::new(pin),
        }
    }

    pub fn level(&self) -> Option<bool> {
        self.driver.level()
    }
}

impl<P: OutputPin> OutputPort for OutputAdapter<P> {
    fn set_output(&mut self, on: bool) {
        self.driver.set(on);
    }
}
