//! Reading value object and publisher identity.
//!
//! A [`Reading`] is one publisher's temperature sample. It is immutable once
//! built and carries the sender's own timestamp; the receiver's arrival time
//! lives in the registry, never here.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length (bytes) of a publisher identity.
pub const PUBLISHER_ID_CAPACITY: usize = 32;

/// Opaque, non-empty publisher identity (at most 32 bytes, no heap).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "heapless::String<PUBLISHER_ID_CAPACITY>")]
pub struct PublisherId(heapless::String<PUBLISHER_ID_CAPACITY>);

impl PublisherId {
    /// Build an identity. Returns `None` for empty or over-long input.
    pub fn new(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        let mut s = heapless::String::new();
        s.push_str(id).ok()?;
        Some(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<heapless::String<PUBLISHER_ID_CAPACITY>> for PublisherId {
    type Error = &'static str;

    fn try_from(s: heapless::String<PUBLISHER_ID_CAPACITY>) -> Result<Self, Self::Error> {
        if s.is_empty() {
            Err("empty publisher id")
        } else {
            Ok(Self(s))
        }
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One temperature sample from one publisher.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub publisher_id: PublisherId,
    /// Degrees Celsius. No range check: sensor artefacts are valid data.
    pub temperature: f32,
    /// Sender clock, integer seconds.
    pub observed_at: u64,
}

impl Reading {
    pub fn new(publisher_id: PublisherId, temperature: f32, observed_at: u64) -> Self {
        Self {
            publisher_id,
            temperature,
            observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_rejected() {
        assert!(PublisherId::new("").is_none());
    }

    #[test]
    fn id_at_capacity_accepted() {
        let id = "p".repeat(PUBLISHER_ID_CAPACITY);
        assert_eq!(PublisherId::new(&id).unwrap().as_str(), id);
    }

    #[test]
    fn id_over_capacity_rejected() {
        assert!(PublisherId::new(&"p".repeat(PUBLISHER_ID_CAPACITY + 1)).is_none());
    }

    #[test]
    fn display_is_raw_id() {
        let id = PublisherId::new("pico_pub_1").unwrap();
        assert_eq!(id.to_string(), "pico_pub_1");
    }

    #[test]
    fn deserialize_rejects_empty_id() {
        let bytes = postcard::to_allocvec("").unwrap();
        assert!(postcard::from_bytes::<PublisherId>(&bytes).is_err());
    }
}
