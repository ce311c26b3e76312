//! Node configuration parameters
//!
//! All tunable parameters for a thermonode unit. Defaults match the
//! reference deployment; a JSON document can override any subset of them.
//! The role is chosen by which of `publisher_id` / `output_gpio` is set.

use serde::{Deserialize, Serialize};

use crate::app::reading::PublisherId;
use crate::error::ConfigError;
use crate::pins;

/// Client id used on the broker by subscriber nodes.
pub const SUBSCRIBER_CLIENT_ID: &str = "subscriber";

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Network ---
    /// WiFi SSID to associate with
    pub wifi_ssid: String,
    /// WiFi passphrase (empty for open networks)
    pub wifi_password: String,
    /// MQTT broker host (IP or hostname)
    pub broker_host: String,
    /// MQTT broker TCP port
    pub broker_port: u16,
    /// MQTT keepalive (seconds)
    pub keepalive_secs: u16,
    /// Topic readings are published to and subscribed from
    pub topic: String,

    // --- Role selection (exactly one must be set) ---
    /// Publisher identity; set to run as a PUBLISHER
    pub publisher_id: Option<String>,
    /// Output GPIO driven by the threshold; set to run as a SUBSCRIBER
    pub output_gpio: Option<i32>,

    // --- Aggregation ---
    /// Average temperature (Celsius) above which the output is switched on
    pub threshold_c: f32,
    /// Seconds after which a silent publisher is evicted
    pub stale_window_secs: u64,

    // --- Timing ---
    /// Publisher sample/publish period (milliseconds)
    pub publisher_tick_ms: u32,
    /// Subscriber transport poll period (milliseconds)
    pub subscriber_tick_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            broker_host: "172.20.10.4".into(),
            broker_port: 1883,
            keepalive_secs: 7000,
            topic: "temp/pico".into(),

            // Subscriber on the onboard LED by default
            publisher_id: None,
            output_gpio: Some(pins::OUTPUT_LED_GPIO),

            threshold_c: 25.0,
            stale_window_secs: 600, // 10 min

            publisher_tick_ms: 2000, // 0.5 Hz
            subscriber_tick_ms: 500, // 2 Hz
            telemetry_interval_secs: 60,
        }
    }
}

/// The role a node runs in, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Publisher { id: PublisherId },
    Subscriber { output_gpio: i32 },
}

impl Role {
    /// Client id presented to the broker.
    pub fn client_id(&self) -> &str {
        match self {
            Self::Publisher { id } => id.as_str(),
            Self::Subscriber { .. } => SUBSCRIBER_CLIENT_ID,
        }
    }
}

impl NodeConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Parse)
    }

    /// Load from an optional override document.
    ///
    /// No document means the built-in defaults. A document that is present
    /// but does not parse is an error; it never falls back to the defaults.
    pub fn load(doc: Option<&str>) -> Result<Self, ConfigError> {
        match doc {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the role from the two mutually exclusive selector fields.
    pub fn role(&self) -> Result<Role, ConfigError> {
        match (&self.publisher_id, self.output_gpio) {
            (Some(_), Some(_)) => Err(ConfigError::BothRolesSet),
            (None, None) => Err(ConfigError::NoRoleSet),
            (Some(id), None) => {
                let id = PublisherId::new(id).ok_or(ConfigError::ValidationFailed(
                    "publisher_id must be 1..=32 bytes",
                ))?;
                Ok(Role::Publisher { id })
            }
            (None, Some(gpio)) => {
                if gpio < 0 {
                    return Err(ConfigError::ValidationFailed("output_gpio must be >= 0"));
                }
                Ok(Role::Subscriber { output_gpio: gpio })
            }
        }
    }

    /// Validate every field and resolve the role. Any error here is fatal.
    pub fn validate(&self) -> Result<Role, ConfigError> {
        if self.broker_host.is_empty() {
            return Err(ConfigError::ValidationFailed("broker_host must not be empty"));
        }
        if self.broker_port == 0 {
            return Err(ConfigError::ValidationFailed("broker_port must be non-zero"));
        }
        if self.topic.is_empty() {
            return Err(ConfigError::ValidationFailed("topic must not be empty"));
        }
        if !self.threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed("threshold_c must be finite"));
        }
        if self.stale_window_secs == 0 {
            return Err(ConfigError::ValidationFailed("stale_window_secs must be > 0"));
        }
        if self.publisher_tick_ms == 0 || self.subscriber_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick periods must be > 0"));
        }
        self.role()
    }

    /// `mqtt://host:port` URL for the broker client.
    pub fn broker_url(&self) -> String {
        format!("mqtt://{}:{}", self.broker_host, self.broker_port)
    }

    /// Tick period for the given role.
    pub fn tick_ms(&self, role: &Role) -> u32 {
        match role {
            Role::Publisher { .. } => self.publisher_tick_ms,
            Role::Subscriber { .. } => self.subscriber_tick_ms,
        }
    }

    /// Number of ticks between telemetry reports for the given role.
    pub fn telemetry_every_ticks(&self, role: &Role) -> u32 {
        let tick_ms = self.tick_ms(role).max(1);
        (self.telemetry_interval_secs.saturating_mul(1000) / tick_ms).max(1)
    }
}
