//! Reading frame codec.
//!
//! Wire format (one MQTT payload = one frame):
//! ```text
//! ┌─────────────┬──────────────────────────────────────────────────┐
//! │ Version (1B)│ postcard body                                    │
//! │ 0x01        │ publisher_id: str │ temperature: f32 │ observed_at│
//! └─────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! The transport already delimits messages, so there is no length prefix.
//! Decoding is strict: unknown versions, leftover bytes, and empty or
//! over-long identities are all rejected rather than guessed at.

use serde::{Deserialize, Serialize};

use crate::app::reading::{PUBLISHER_ID_CAPACITY, PublisherId, Reading};
use crate::error::CodecError;

/// Current frame format version.
pub const FRAME_VERSION: u8 = 0x01;

/// Upper bound on a well-formed frame: version + id (len varint + 32 B)
/// + f32 + u64 varint, rounded up.
pub const MAX_FRAME_LEN: usize = 64;

#[derive(Serialize, Deserialize)]
struct WireReading<'a> {
    publisher_id: &'a str,
    temperature: f32,
    observed_at: u64,
}

/// Encode a reading into a self-contained frame.
pub fn encode(reading: &Reading) -> Result<Vec<u8>, CodecError> {
    let wire = WireReading {
        publisher_id: reading.publisher_id.as_str(),
        temperature: reading.temperature,
        observed_at: reading.observed_at,
    };
    let mut frame = Vec::with_capacity(MAX_FRAME_LEN);
    frame.push(FRAME_VERSION);
    let frame = postcard::to_extend(&wire, frame).map_err(|_| CodecError::EncodeFailed)?;
    Ok(frame)
}

/// Decode one frame. Never panics on arbitrary input.
pub fn decode(frame: &[u8]) -> Result<Reading, CodecError> {
    let (&version, body) = frame.split_first().ok_or(CodecError::Empty)?;
    if version != FRAME_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    if frame.len() > MAX_FRAME_LEN {
        return Err(CodecError::Malformed);
    }

    let (wire, rest): (WireReading<'_>, _) =
        postcard::take_from_bytes(body).map_err(|_| CodecError::Malformed)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes);
    }

    if wire.publisher_id.is_empty() {
        return Err(CodecError::EmptyPublisherId);
    }
    if wire.publisher_id.len() > PUBLISHER_ID_CAPACITY {
        return Err(CodecError::PublisherIdTooLong);
    }
    let id = PublisherId::new(wire.publisher_id).ok_or(CodecError::Malformed)?;

    Ok(Reading::new(id, wire.temperature, wire.observed_at))
}
