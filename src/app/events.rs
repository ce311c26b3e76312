//! Outbound application events.
//!
//! The publisher and subscriber services emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them; in firmware they become serial log lines.

use crate::config::Role;
use crate::error::{CodecError, SensorError, TransportError};

use super::reading::{PublisherId, Reading};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The node finished startup in the given role.
    Started(Role),

    /// Publisher: a reading was handed to the transport.
    Published(Reading),

    /// Publisher: the sensor could not be read this tick.
    SensorFailed(SensorError),

    /// Publisher: the reading could not be encoded or sent this tick.
    PublishFailed(PublishFailure),

    /// Subscriber: a reading was decoded and stored.
    Received {
        reading: Reading,
        received_at: u64,
        new_publisher: bool,
    },

    /// Subscriber: an inbound frame was rejected.
    DecodeFailed(CodecError),

    /// Subscriber: the transport poll failed.
    PollFailed(TransportError),

    /// Subscriber: a publisher aged out of the registry.
    PublisherEvicted(PublisherId),

    /// Subscriber: the output was written after aggregation.
    OutputApplied {
        on: bool,
        changed: bool,
        average_c: f32,
        threshold_c: f32,
    },

    /// Subscriber: no live publishers, output held.
    OutputHeld,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// Why a publisher tick failed to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishFailure {
    Encode(CodecError),
    Transport(TransportError),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryData {
    Publisher(PublisherStats),
    Subscriber(SubscriberStats),
}

/// Counters kept by the publisher service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublisherStats {
    pub ticks: u64,
    pub published: u64,
    pub sensor_failures: u64,
    pub publish_failures: u64,
    pub last_temperature_c: Option<f32>,
}

/// Counters kept by the subscriber service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriberStats {
    pub ticks: u64,
    pub frames: u64,
    pub decode_failures: u64,
    pub poll_failures: u64,
    pub evictions: u64,
    pub live_publishers: usize,
    pub last_average_c: Option<f32>,
    pub output_on: Option<bool>,
}
