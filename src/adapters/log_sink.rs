//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{AppEvent, PublishFailure, TelemetryData};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(role) => {
                info!("START | role={:?} client_id={}", role, role.client_id());
            }
            AppEvent::Published(r) => {
                info!(
                    "PUB | {} {:.2}\u{00b0}C at {}",
                    r.publisher_id, r.temperature, r.observed_at
                );
            }
            AppEvent::SensorFailed(e) => warn!("PUB | sensor read failed: {}", e),
            AppEvent::PublishFailed(PublishFailure::Encode(e)) => {
                warn!("PUB | encode failed: {}", e);
            }
            AppEvent::PublishFailed(PublishFailure::Transport(e)) => {
                warn!("PUB | send failed: {}", e);
            }
            AppEvent::Received {
                reading,
                received_at,
                new_publisher,
            } => {
                info!(
                    "RECV | {} {:.2}\u{00b0}C at {} (rx {}){}",
                    reading.publisher_id,
                    reading.temperature,
                    reading.observed_at,
                    received_at,
                    if *new_publisher { " new" } else { "" },
                );
            }
            AppEvent::DecodeFailed(e) => warn!("RECV | frame dropped: {}", e),
            AppEvent::PollFailed(e) => warn!("RECV | poll failed: {}", e),
            AppEvent::PublisherEvicted(id) => info!("EVICT | {} stale", id),
            AppEvent::OutputApplied {
                on,
                changed,
                average_c,
                threshold_c,
            } => {
                let cmp = if *on { ">" } else { "<=" };
                info!(
                    "OUTPUT | {} - Avg temp {:.2} {} {:.2}{}",
                    on_off(*on),
                    average_c,
                    cmp,
                    threshold_c,
                    if *changed { " (changed)" } else { "" },
                );
            }
            AppEvent::OutputHeld => info!("OUTPUT | held, no live publishers"),
            AppEvent::Telemetry(TelemetryData::Publisher(s)) => {
                info!(
                    "TELEM | ticks={} published={} sensor_fail={} publish_fail={} last={:?}",
                    s.ticks, s.published, s.sensor_failures, s.publish_failures, s.last_temperature_c,
                );
            }
            AppEvent::Telemetry(TelemetryData::Subscriber(s)) => {
                info!(
                    "TELEM | ticks={} frames={} decode_fail={} poll_fail={} evicted={} \
                     live={} avg={:?} output={}",
                    s.ticks,
                    s.frames,
                    s.decode_failures,
                    s.poll_failures,
                    s.evictions,
                    s.live_publishers,
                    s.last_average_c,
                    s.output_on.map_or("?", on_off),
                );
            }
        }
    }
}
