//! Sensor drivers.

pub mod temperature;
