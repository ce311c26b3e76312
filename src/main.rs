//! Thermonode Firmware: Main Entry Point
//!
//! One binary, two roles. The role is fixed at boot by configuration and
//! never changes for the life of the process.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  TemperatureAdapter  OutputAdapter  MqttTransport  LogEventSink│
//! │  (SensorPort)        (OutputPort)   (Transport)    (EventSink) │
//! │  UptimeClock / WallClock (ClockPort)   WifiAdapter (boot only) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  PublisherService        SubscriberService             │    │
//! │  │                          Registry · Average · Threshold│    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  NodeScheduler ◀── TICK ◀── esp_timer (hw_timer)               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use thermonode::adapters::hardware::{OutputAdapter, TemperatureAdapter};
use thermonode::adapters::log_sink::LogEventSink;
use thermonode::adapters::mqtt;
use thermonode::adapters::time::{UptimeClock, WallClock};
use thermonode::adapters::wifi::WifiAdapter;
use thermonode::app::ports::ClockPort;
use thermonode::app::publisher::PublisherService;
use thermonode::app::subscriber::SubscriberService;
use thermonode::config::{NodeConfig, Role};
use thermonode::drivers::{hw_init, hw_timer};
use thermonode::error::ConfigError;
use thermonode::events::TICK;
use thermonode::net::transport::TransportPort;
use thermonode::pins;
use thermonode::scheduler::{NodeScheduler, PublisherNode, RoleNode, SubscriberNode};
use thermonode::sensors::temperature::TemperatureSensor;

/// Main-loop idle sleep between tick flag checks.
const IDLE_SLEEP_MS: u64 = 10;

/// Load the build-time override document. A document that does not parse
/// is fatal: the node must not boot in a role it was not given.
fn load_config() -> Result<NodeConfig, ConfigError> {
    let doc = option_env!("THERMONODE_CONFIG");
    match doc {
        Some(_) => info!("Config: applying THERMONODE_CONFIG"),
        None => info!("No THERMONODE_CONFIG, using defaults"),
    }
    NodeConfig::load(doc)
}

/// Start the role, arm the tick timer, and run ticks forever.
fn run<R, T, C>(
    mut sched: NodeScheduler<R, T, C, LogEventSink>,
    tick_ms: u32,
) -> Result<()>
where
    R: RoleNode,
    T: TransportPort,
    C: ClockPort,
{
    sched.start().map_err(thermonode::Error::from)?;
    hw_timer::start_tick_timer(&TICK, tick_ms)?;

    loop {
        if TICK.take() {
            sched.tick();
        } else {
            std::thread::sleep(std::time::Duration::from_millis(IDLE_SLEEP_MS));
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermonode v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (any config error is fatal) ─────────
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("THERMONODE_CONFIG rejected: {}, halting", e);
            return Err(thermonode::Error::from(e).into());
        }
    };
    let role = match config.validate() {
        Ok(role) => role,
        Err(e) => {
            error!("Config invalid: {}, halting", e);
            return Err(thermonode::Error::from(e).into());
        }
    };
    info!("Role: {:?}", role);

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();

    let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs)?;
    wifi.connect_blocking(&config.wifi_ssid, &config.wifi_password)?;

    let transport =
        mqtt::transport_for(config.broker_url(), role.client_id(), config.keepalive_secs);
    let tick_ms = config.tick_ms(&role);
    let telemetry_every = config.telemetry_every_ticks(&role);

    // ── 4. Role wiring ────────────────────────────────────────
    match role.clone() {
        Role::Publisher { id } => {
            hw_init::init_adc(pins::TEMP_ADC_CHANNEL)?;
            let node = PublisherNode {
                service: PublisherService::new(id, config.topic.clone()),
                sensor: TemperatureAdapter::new(TemperatureSensor::new(pins::TEMP_ADC_CHANNEL)),
            };
            let sched = NodeScheduler::new(
                role,
                node,
                transport,
                WallClock,
                LogEventSink::new(),
                telemetry_every,
            );
            run(sched, tick_ms)
        }
        Role::Subscriber { output_gpio } => {
            // SAFETY: the output GPIO is claimed here only; nothing else in
            // the firmware touches it.
            let pin = PinDriver::output(unsafe { AnyOutputPin::new(output_gpio) })?;
            let node = SubscriberNode {
                service: SubscriberService::new(config.threshold_c, config.stale_window_secs),
                output: OutputAdapter::new(pin),
                topic: config.topic.clone(),
            };
            let sched = NodeScheduler::new(
                role,
                node,
                transport,
                UptimeClock::new(),
                LogEventSink::new(),
                telemetry_every,
            );
            run(sched, tick_ms)
        }
    }
}
