//! Publisher service: sample, stamp, encode, send.
//!
//! Every tick is an independent attempt: a sensor, encode, or transport
//! failure is reported through the [`EventSink`] and the next tick starts
//! from scratch. There is no backoff and no retry counter.

use log::debug;

use crate::net::codec;
use crate::net::transport::TransportPort;

use super::events::{AppEvent, PublishFailure, PublisherStats, TelemetryData};
use super::ports::{ClockPort, EventSink, SensorPort};
use super::reading::{PublisherId, Reading};

/// Result of one publisher tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Sent(Reading),
    SensorFailed,
    EncodeFailed,
    TransportFailed,
}

/// Owns the node's identity and target topic.
pub struct PublisherService {
    id: PublisherId,
    topic: String,
    stats: PublisherStats,
}

impl PublisherService {
    pub fn new(id: PublisherId, topic: impl Into<String>) -> Self {
        Self {
            id,
            topic: topic.into(),
            stats: PublisherStats::default(),
        }
    }

    /// Run one publish cycle: read sensor → build reading → encode → publish.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        clock: &impl ClockPort,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> PublishOutcome {
        self.stats.ticks += 1;

        let temperature = match sensor.read_temperature() {
            Ok(t) => t,
            Err(e) => {
                self.stats.sensor_failures += 1;
                sink.emit(&AppEvent::SensorFailed(e));
                return PublishOutcome::SensorFailed;
            }
        };
        self.stats.last_temperature_c = Some(temperature);

        let reading = Reading::new(self.id.clone(), temperature, clock.now_secs());

        let frame = match codec::encode(&reading) {
            Ok(f) => f,
            Err(e) => {
                self.stats.publish_failures += 1;
                sink.emit(&AppEvent::PublishFailed(PublishFailure::Encode(e)));
                return PublishOutcome::EncodeFailed;
            }
        };

        if let Err(e) = transport.publish(&self.topic, &frame) {
            self.stats.publish_failures += 1;
            sink.emit(&AppEvent::PublishFailed(PublishFailure::Transport(e)));
            return PublishOutcome::TransportFailed;
        }

        self.stats.published += 1;
        debug!("Publisher: {} bytes on '{}'", frame.len(), self.topic);
        sink.emit(&AppEvent::Published(reading.clone()));
        PublishOutcome::Sent(reading)
    }

    pub fn id(&self) -> &PublisherId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn stats(&self) -> &PublisherStats {
        &self.stats
    }

    pub fn telemetry(&self) -> TelemetryData {
        TelemetryData::Publisher(self.stats.clone())
    }
}
