//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to                 |
//! |-------------|-------------------------|-----------------------------|
//! | `hardware`  | SensorPort, OutputPort  | ESP32 ADC, GPIO             |
//! | `log_sink`  | EventSink               | Serial log output           |
//! | `mqtt`      | TransportPort           | ESP-IDF MQTT client         |
//! | `time`      | ClockPort               | esp_timer / system clock    |
//! | `wifi`      | (boot-time only)        | ESP-IDF WiFi STA            |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
