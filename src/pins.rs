//! GPIO / peripheral pin assignments for the thermonode board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensor: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Analog temperature sensor output.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 1;
/// ADC1 channel number matching [`TEMP_ADC_GPIO`].
pub const TEMP_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Onboard LED, the default subscriber output.
pub const OUTPUT_LED_GPIO: i32 = 2;
