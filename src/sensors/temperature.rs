//! Analog temperature sensor.
//!
//! The sensor's output voltage falls linearly with temperature:
//! 0.706 V at 27 °C and a slope of -1.721 mV/°C. Samples are normalised
//! to 16 bits before conversion so the maths does not depend on the ADC's
//! native resolution.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Simulated 16-bit sample; the default converts to roughly 20 °C.
#[cfg_attr(target_os = "espidf", allow(dead_code))]
static SIM_TEMP_RAW: AtomicU16 = AtomicU16::new(14_260);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_raw(raw: u16) {
    SIM_TEMP_RAW.store(raw, Ordering::Relaxed);
}

const V_REF: f32 = 3.3;
const FULL_SCALE: f32 = 65_536.0;
const V_AT_27C: f32 = 0.706;
const SLOPE_V_PER_C: f32 = 0.001_721;

#[derive(Debug, Clone, Copy)]
pub struct TemperatureReading {
    /// 16-bit normalised sample.
    pub raw: u16,
    pub celsius: f32,
}

pub struct TemperatureSensor {
    _adc_channel: u32,
}

impl TemperatureSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self {
            _adc_channel: adc_channel,
        }
    }

    pub fn read(&self) -> Result<TemperatureReading, SensorError> {
        let raw = self.read_adc()?;
        let celsius = raw_to_celsius(raw);
        if !celsius.is_finite() {
            return Err(SensorError::NotFinite);
        }
        Ok(TemperatureReading { raw, celsius })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        // 12-bit sample scaled up to the 16-bit range
        hw_init::adc1_read(self._adc_channel)
            .map(|raw12| raw12 << 4)
            .ok_or(SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        Ok(SIM_TEMP_RAW.load(Ordering::Relaxed))
    }
}

/// Convert a 16-bit normalised sample to degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f32 {
    let voltage = f32::from(raw) * (V_REF / FULL_SCALE);
    27.0 - (voltage - V_AT_27C) / SLOPE_V_PER_C
}
