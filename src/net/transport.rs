//! Transport abstraction: a topic-based publish/subscribe client.
//!
//! Concrete implementations:
//! - ESP-IDF MQTT client (see [`crate::adapters::mqtt`])
//! - in-memory loopback for host simulation and tests
//!
//! The services are generic over `TransportPort`, so swapping the broker
//! client requires zero changes to the aggregation logic. Inbound messages
//! are pulled with [`poll_once`](TransportPort::poll_once) rather than pushed
//! through a callback; the scheduler is the message handler.

use crate::error::TransportError;

/// Message-broker client port.
pub trait TransportPort {
    /// Establish the broker session. Failure at boot is fatal.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Publish one frame on `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Register interest in `topic`.
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Return at most one pending inbound frame, or `None` if nothing is
    /// waiting. Non-blocking.
    fn poll_once(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}
