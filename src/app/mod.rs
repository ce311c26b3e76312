//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for a thermonode: the reading
//! model, the publisher registry, and the two role services. All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`] and [`crate::net::transport`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod publisher;
pub mod reading;
pub mod registry;
pub mod subscriber;
