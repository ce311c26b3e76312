//! Subscriber service: the aggregation engine.
//!
//! [`SubscriberService`] owns the publisher registry and the threshold
//! controller. Each inbound frame runs the full pipeline in a fixed order:
//!
//! ```text
//!  frame ──▶ decode ──▶ upsert ──▶ evict_stale ──▶ average ──▶ apply ──▶ OutputPort
//! ```
//!
//! Ticks that bring no frame do nothing: the output only changes in
//! response to new data, even though staleness may have shrunk the live
//! set in the meantime.

use log::{debug, warn};

use crate::control::average::average;
use crate::control::threshold::{Actuation, ThresholdController};
use crate::error::{CodecError, TransportError};
use crate::net::codec;
use crate::net::transport::TransportPort;

use super::events::{AppEvent, SubscriberStats, TelemetryData};
use super::ports::{ClockPort, EventSink, OutputPort};
use super::reading::Reading;
use super::registry::{PublisherRegistry, Upsert};

/// Result of one subscriber tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// No frame was waiting.
    Idle,
    /// A frame was decoded and the pipeline ran.
    Processed(Actuation),
    /// The frame was rejected; registry and output untouched.
    Rejected(CodecError),
    /// The transport poll itself failed.
    PollFailed(TransportError),
}

/// The single aggregation engine instance of a subscriber node.
pub struct SubscriberService {
    registry: PublisherRegistry,
    controller: ThresholdController,
    stale_window_secs: u64,
    stats: SubscriberStats,
}

impl SubscriberService {
    pub fn new(threshold_c: f32, stale_window_secs: u64) -> Self {
        Self {
            registry: PublisherRegistry::new(),
            controller: ThresholdController::new(threshold_c),
            stale_window_secs,
            stats: SubscriberStats::default(),
        }
    }

    /// Drive the output to its boot level (OFF).
    pub fn start(&mut self, output: &mut impl OutputPort) {
        self.controller.initialise(output);
        self.stats.output_on = Some(false);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Poll the transport once and process at most one frame.
    pub fn tick(
        &mut self,
        transport: &mut impl TransportPort,
        clock: &impl ClockPort,
        output: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> PollOutcome {
        self.stats.ticks += 1;

        let frame = match transport.poll_once() {
            Ok(Some(frame)) => frame,
            Ok(None) => return PollOutcome::Idle,
            Err(e) => {
                self.stats.poll_failures += 1;
                sink.emit(&AppEvent::PollFailed(e));
                return PollOutcome::PollFailed(e);
            }
        };

        match self.handle_frame(&frame, clock.now_secs(), output, sink) {
            Ok(actuation) => PollOutcome::Processed(actuation),
            Err(e) => PollOutcome::Rejected(e),
        }
    }

    /// Decode one frame and, on success, run the aggregation pipeline.
    pub fn handle_frame(
        &mut self,
        frame: &[u8],
        received_at: u64,
        output: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<Actuation, CodecError> {
        self.stats.frames += 1;
        match codec::decode(frame) {
            Ok(reading) => Ok(self.ingest(reading, received_at, output, sink)),
            Err(e) => {
                self.stats.decode_failures += 1;
                warn!("Subscriber: dropped {}-byte frame ({})", frame.len(), e);
                sink.emit(&AppEvent::DecodeFailed(e));
                Err(e)
            }
        }
    }

    /// upsert → evict_stale → average → apply, in that order.
    pub fn ingest(
        &mut self,
        reading: Reading,
        received_at: u64,
        output: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Actuation {
        let upsert = self.registry.upsert(reading.clone(), received_at);
        sink.emit(&AppEvent::Received {
            reading,
            received_at,
            new_publisher: upsert == Upsert::Inserted,
        });

        let evicted = self
            .registry
            .evict_stale(received_at, self.stale_window_secs);
        self.stats.evictions += evicted.len() as u64;
        for id in evicted {
            sink.emit(&AppEvent::PublisherEvicted(id));
        }
        self.stats.live_publishers = self.registry.len();

        let avg = average(self.registry.live_readings());
        self.stats.last_average_c = avg;

        let actuation = self.controller.apply(avg, output);
        match (actuation, avg) {
            (Actuation::Applied { on, changed }, Some(average_c)) => {
                self.stats.output_on = Some(on);
                sink.emit(&AppEvent::OutputApplied {
                    on,
                    changed,
                    average_c,
                    threshold_c: self.controller.threshold(),
                });
            }
            _ => {
                debug!("Subscriber: no live publishers, output held");
                sink.emit(&AppEvent::OutputHeld);
            }
        }
        actuation
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &PublisherRegistry {
        &self.registry
    }

    pub fn stale_window_secs(&self) -> u64 {
        self.stale_window_secs
    }

    pub fn output_on(&self) -> Option<bool> {
        self.controller.last_applied()
    }

    pub fn stats(&self) -> &SubscriberStats {
        &self.stats
    }

    pub fn telemetry(&self) -> TelemetryData {
        TelemetryData::Subscriber(self.stats.clone())
    }
}
