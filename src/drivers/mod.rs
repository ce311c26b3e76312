//! Peripheral drivers, hardware initialisation, and the tick timer.

pub mod hw_init;
pub mod hw_timer;
pub mod output;
