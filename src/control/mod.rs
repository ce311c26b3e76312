//! Control algorithms: averaging and threshold actuation.

pub mod average;
pub mod threshold;
