//! MQTT transport adapter.
//!
//! Implements [`TransportPort`] on top of the ESP-IDF MQTT client. The
//! client's event callback runs on the MQTT task; it only pushes inbound
//! payloads into a bounded [`Inbox`], which the tick body drains one frame
//! at a time through [`poll_once`](TransportPort::poll_once).
//!
//! ```text
//! ┌────────────┐ Received ┌───────────┐ poll_once() ┌──────────────┐
//! │ MQTT task  │─────────▶│   Inbox   │────────────▶│  tick body   │
//! │ (callback) │          │ (bounded) │             │ (subscriber) │
//! └────────────┘          └───────────┘             └──────────────┘
//! ```
//!
//! On non-espidf targets the transport is an in-memory loopback:
//! publishing on a subscribed topic delivers the frame to the inbox.
//!
//! All publishes and subscriptions use QoS 0 (at most once).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::error::TransportError;
use crate::net::codec::MAX_FRAME_LEN;
use crate::net::transport::TransportPort;

/// Maximum frames buffered between ticks. Older frames are dropped first.
pub const INBOX_CAPACITY: usize = 16;

// ───────────────────────────────────────────────────────────────
// Inbox
// ───────────────────────────────────────────────────────────────

/// What [`Inbox::push`] did with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Queued after evicting the oldest buffered frame.
    DroppedOldest,
    /// Larger than any valid frame; not queued.
    Oversized,
    /// The inbox lock is poisoned; not queued.
    Unavailable,
}

/// Bounded FIFO of inbound frames shared with the client callback.
#[derive(Clone, Default)]
pub struct Inbox {
    frames: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one frame, dropping the oldest one if the inbox is full.
    pub fn push(&self, frame: &[u8]) -> Delivery {
        if frame.len() > MAX_FRAME_LEN {
            warn!("MQTT: dropping oversized {}-byte frame", frame.len());
            return Delivery::Oversized;
        }
        let Ok(mut q) = self.frames.lock() else {
            warn!("MQTT: inbox lock poisoned, frame dropped");
            return Delivery::Unavailable;
        };
        let mut delivery = Delivery::Queued;
        if q.len() >= INBOX_CAPACITY {
            q.pop_front();
            delivery = Delivery::DroppedOldest;
        }
        q.push_back(frame.to_vec());
        delivery
    }

    pub fn pop(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut q = self.frames.lock().map_err(|_| TransportError::PollFailed)?;
        Ok(q.pop_front())
    }

    pub fn len(&self) -> usize {
        self.frames.lock().map_or(0, |q| q.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use core::time::Duration;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
    use log::{error, info, warn};

    use super::{Delivery, Inbox, TransportError, TransportPort};

    const CONNECT_TIMEOUT_MS: u32 = 10_000;
    const CONNECT_POLL_MS: u32 = 100;

    pub struct MqttTransport {
        url: String,
        client_id: String,
        keepalive_secs: u16,
        client: Option<EspMqttClient<'static>>,
        connected: Arc<AtomicBool>,
        inbox: Inbox,
    }

    impl MqttTransport {
        pub fn new(url: String, client_id: &str, keepalive_secs: u16) -> Self {
            Self {
                url,
                client_id: client_id.into(),
                keepalive_secs,
                client: None,
                connected: Arc::new(AtomicBool::new(false)),
                inbox: Inbox::new(),
            }
        }

        pub fn inbox(&self) -> &Inbox {
            &self.inbox
        }

        fn client(&mut self) -> Result<&mut EspMqttClient<'static>, TransportError> {
            if !self.connected.load(Ordering::Acquire) {
                return Err(TransportError::NotConnected);
            }
            self.client.as_mut().ok_or(TransportError::NotConnected)
        }
    }

    impl TransportPort for MqttTransport {
        fn connect(&mut self) -> Result<(), TransportError> {
            let conf = MqttClientConfiguration {
                client_id: Some(self.client_id.as_str()),
                keep_alive_interval: Some(Duration::from_secs(u64::from(self.keepalive_secs))),
                ..Default::default()
            };

            let connected = Arc::clone(&self.connected);
            let inbox = self.inbox.clone();
            let client = EspMqttClient::new_cb(&self.url, &conf, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => connected.store(true, Ordering::Release),
                    EventPayload::Disconnected => {
                        connected.store(false, Ordering::Release);
                        warn!("MQTT: disconnected");
                    }
                    EventPayload::Received { data, .. } => {
                        if inbox.push(data) == Delivery::DroppedOldest {
                            warn!("MQTT: inbox full, oldest frame dropped");
                        }
                    }
                    EventPayload::Error(e) => error!("MQTT: {:?}", e),
                    _ => {}
                }
            })
            .map_err(|e| {
                error!("MQTT: client init failed: {}", e);
                TransportError::ConnectFailed
            })?;
            self.client = Some(client);

            let mut waited = 0;
            while !self.connected.load(Ordering::Acquire) {
                if waited >= CONNECT_TIMEOUT_MS {
                    error!("MQTT: no CONNACK from {} after {}ms", self.url, waited);
                    return Err(TransportError::ConnectFailed);
                }
                std::thread::sleep(Duration::from_millis(u64::from(CONNECT_POLL_MS)));
                waited += CONNECT_POLL_MS;
            }
            info!("MQTT: connected to {} as '{}'", self.url, self.client_id);
            Ok(())
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            self.client()?
                .publish(topic, QoS::AtMostOnce, false, payload)
                .map(|_| ())
                .map_err(|_| TransportError::PublishFailed)
        }

        fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
            self.client()?
                .subscribe(topic, QoS::AtMostOnce)
                .map(|_| ())
                .map_err(|_| TransportError::SubscribeFailed)
        }

        fn poll_once(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
            self.inbox.pop()
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Loopback (simulation)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use log::info;

    use super::{Delivery, Inbox, TransportError, TransportPort};

    pub struct MqttTransport {
        url: String,
        client_id: String,
        connected: bool,
        subscriptions: Vec<String>,
        inbox: Inbox,
        /// Simulation: make the next connect fail.
        pub sim_refuse_connect: bool,
    }

    impl MqttTransport {
        pub fn new(url: String, client_id: &str, _keepalive_secs: u16) -> Self {
            Self {
                url,
                client_id: client_id.into(),
                connected: false,
                subscriptions: Vec::new(),
                inbox: Inbox::new(),
                sim_refuse_connect: false,
            }
        }

        pub fn inbox(&self) -> &Inbox {
            &self.inbox
        }

        /// Deliver a frame as if it arrived from the broker.
        pub fn inject(&self, frame: &[u8]) -> Delivery {
            self.inbox.push(frame)
        }

        pub fn is_connected(&self) -> bool {
            self.connected
        }
    }

    impl TransportPort for MqttTransport {
        fn connect(&mut self) -> Result<(), TransportError> {
            if self.sim_refuse_connect {
                return Err(TransportError::ConnectFailed);
            }
            self.connected = true;
            info!("MQTT(sim): connected to {} as '{}'", self.url, self.client_id);
            Ok(())
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            if self.subscriptions.iter().any(|t| t == topic) {
                self.inbox.push(payload);
            }
            Ok(())
        }

        fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            if !self.subscriptions.iter().any(|t| t == topic) {
                self.subscriptions.push(topic.into());
            }
            Ok(())
        }

        fn poll_once(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
            self.inbox.pop()
        }
    }
}

pub use platform::MqttTransport;

/// Build the transport for `url`, logging the endpoint once.
pub fn transport_for(url: String, client_id: &str, keepalive_secs: u16) -> MqttTransport {
    info!("MQTT: broker {} client_id '{}' keepalive {}s", url, client_id, keepalive_secs);
    MqttTransport::new(url, client_id, keepalive_secs)
}
