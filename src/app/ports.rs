//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PublisherService / SubscriberService (domain)
//! ```
//!
//! Driven adapters (sensor, output pin, clocks, event sinks) implement these
//! traits. The services consume them via generics, so the domain core never
//! touches hardware directly. The message transport has its own port in
//! [`crate::net::transport`].

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the publisher calls this once per tick.
pub trait SensorPort {
    /// Sample the temperature sensor (degrees Celsius).
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single binary actuator.
///
/// Implementations must be idempotent: writing the current level again is
/// a no-op on the hardware.
pub trait OutputPort {
    fn set_output(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Whole-second clock.
///
/// Publishers stamp readings with one of these, subscribers stamp arrival
/// with another. The two are never assumed to agree.
pub trait ClockPort {
    fn now_secs(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
