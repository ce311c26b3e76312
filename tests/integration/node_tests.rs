//! End-to-end: a publisher node and a subscriber node share one loopback
//! broker, each driven by its own scheduler.

use thermonode::adapters::mqtt::MqttTransport;
use thermonode::app::events::{AppEvent, TelemetryData};
use thermonode::app::publisher::PublisherService;
use thermonode::app::subscriber::SubscriberService;
use thermonode::config::{NodeConfig, Role};
use thermonode::error::TransportError;
use thermonode::net::transport::TransportPort;
use thermonode::scheduler::{NodeScheduler, PublisherNode, SubscriberNode};

use crate::mock_hw::{ManualClock, MockOutput, MockSensor, RecordingSink, pid};

/// Forwards publishes into a shared loopback so several nodes can talk.
struct SharedWire<'a>(&'a std::cell::RefCell<MqttTransport>);

impl TransportPort for SharedWire<'_> {
    fn connect(&mut self) -> Result<(), TransportError> {
        let mut w = self.0.borrow_mut();
        if w.is_connected() { Ok(()) } else { w.connect() }
    }
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.0.borrow_mut().publish(topic, payload)
    }
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.0.borrow_mut().subscribe(topic)
    }
    fn poll_once(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        self.0.borrow_mut().poll_once()
    }
}

#[test]
fn publisher_heat_turns_subscriber_output_on() {
    let cfg = NodeConfig::default();
    let broker = std::cell::RefCell::new(MqttTransport::new(cfg.broker_url(), "broker", 60));
    let clock = ManualClock::at(0);

    let sub_role = cfg.validate().unwrap();
    let mut sub = NodeScheduler::new(
        sub_role.clone(),
        SubscriberNode {
            service: SubscriberService::new(cfg.threshold_c, cfg.stale_window_secs),
            output: MockOutput::new(),
            topic: cfg.topic.clone(),
        },
        SharedWire(&broker),
        &clock,
        RecordingSink::new(),
        cfg.telemetry_every_ticks(&sub_role),
    );
    sub.start().unwrap();

    let mut publisher = NodeScheduler::new(
        Role::Publisher { id: pid("pico_pub_1") },
        PublisherNode {
            service: PublisherService::new(pid("pico_pub_1"), cfg.topic.clone()),
            sensor: MockSensor::constant(31.0),
        },
        SharedWire(&broker),
        &clock,
        RecordingSink::new(),
        30,
    );
    publisher.start().unwrap();

    publisher.tick();
    sub.tick();

    assert_eq!(sub.node().output.writes, vec![false, true]);
    assert!(sub.node().service.registry().contains(&pid("pico_pub_1")));
}

#[test]
fn subscriber_reports_telemetry_on_schedule() {
    let broker = std::cell::RefCell::new(MqttTransport::new("mqtt://sim:1883".into(), "b", 60));
    let clock = ManualClock::at(0);
    let mut sub = NodeScheduler::new(
        Role::Subscriber { output_gpio: 2 },
        SubscriberNode {
            service: SubscriberService::new(25.0, 600),
            output: MockOutput::new(),
            topic: "temp/pico".into(),
        },
        SharedWire(&broker),
        &clock,
        RecordingSink::new(),
        4,
    );
    sub.start().unwrap();
    for _ in 0..8 {
        sub.tick();
    }
    let telemetry: Vec<_> = sub
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(TelemetryData::Subscriber(s)) => Some(s.ticks),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry, vec![4, 8]);
}

#[test]
fn refused_broker_is_fatal_at_start() {
    let mut wire = MqttTransport::new("mqtt://sim:1883".into(), "subscriber", 60);
    wire.sim_refuse_connect = true;
    let mut sub = NodeScheduler::new(
        Role::Subscriber { output_gpio: 2 },
        SubscriberNode {
            service: SubscriberService::new(25.0, 600),
            output: MockOutput::new(),
            topic: "temp/pico".into(),
        },
        wire,
        ManualClock::at(0),
        RecordingSink::new(),
        1,
    );
    assert_eq!(sub.start(), Err(TransportError::ConnectFailed));
    assert!(sub.node().output.writes.is_empty());
}
