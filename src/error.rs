//! Unified error types for the thermonode firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! boot path's error handling uniform. All variants are `Copy` so the tick
//! handlers can log and drop them without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature sensor could not be read.
    Sensor(SensorError),
    /// A frame could not be encoded or decoded.
    Codec(CodecError),
    /// The message transport failed.
    Transport(TransportError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error.
    AdcReadFailed,
    /// Conversion produced NaN or infinity.
    NotFinite,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::NotFinite => write!(f, "reading is not a finite number"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Zero-length frame.
    Empty,
    /// Leading version byte is not one we understand.
    UnsupportedVersion(u8),
    /// Body could not be deserialised.
    Malformed,
    /// Body deserialised but bytes were left over.
    TrailingBytes,
    /// `publisher_id` was empty.
    EmptyPublisherId,
    /// `publisher_id` exceeds the identity capacity.
    PublisherIdTooLong,
    /// Serialisation failed on the way out.
    EncodeFailed,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty frame"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported frame version 0x{v:02x}"),
            Self::Malformed => write!(f, "malformed frame body"),
            Self::TrailingBytes => write!(f, "trailing bytes after frame body"),
            Self::EmptyPublisherId => write!(f, "empty publisher id"),
            Self::PublisherIdTooLong => write!(f, "publisher id too long"),
            Self::EncodeFailed => write!(f, "encode failed"),
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Broker connection could not be established.
    ConnectFailed,
    /// Operation attempted before `connect()` succeeded.
    NotConnected,
    /// Publish was rejected by the client.
    PublishFailed,
    /// Subscribe was rejected by the client.
    SubscribeFailed,
    /// Inbound poll failed.
    PollFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "broker connect failed"),
            Self::NotConnected => write!(f, "not connected"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PollFailed => write!(f, "poll failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Both `publisher_id` and `output_gpio` are set.
    BothRolesSet,
    /// Neither `publisher_id` nor `output_gpio` is set.
    NoRoleSet,
    /// A field failed range validation. Names the field and the rule.
    ValidationFailed(&'static str),
    /// The JSON document could not be parsed.
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BothRolesSet => {
                write!(f, "both output_gpio and publisher_id are set; only one should be set")
            }
            Self::NoRoleSet => {
                write!(f, "both output_gpio and publisher_id are unset; set one to choose a role")
            }
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Parse => write!(f, "config document could not be parsed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
