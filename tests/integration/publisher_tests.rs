//! Publisher tick tests against the loopback transport.

use thermonode::adapters::mqtt::MqttTransport;
use thermonode::app::events::AppEvent;
use thermonode::app::publisher::{PublishOutcome, PublisherService};
use thermonode::error::SensorError;
use thermonode::net::codec;
use thermonode::net::transport::TransportPort;

use crate::mock_hw::{ManualClock, MockSensor, RecordingSink, pid};

fn loopback() -> MqttTransport {
    let mut wire = MqttTransport::new("mqtt://sim:1883".into(), "pico_pub_1", 60);
    wire.connect().unwrap();
    wire.subscribe("temp/pico").unwrap();
    wire
}

#[test]
fn each_tick_publishes_one_decodable_frame() {
    let mut svc = PublisherService::new(pid("pico_pub_1"), "temp/pico");
    let mut sensor = MockSensor::constant(21.25);
    let clock = ManualClock::at(1_700_000_000);
    let mut wire = loopback();
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        assert!(matches!(
            svc.tick(&mut sensor, &clock, &mut wire, &mut sink),
            PublishOutcome::Sent(_)
        ));
        clock.advance(2);
    }

    let mut stamps = Vec::new();
    while let Some(frame) = wire.poll_once().unwrap() {
        let r = codec::decode(&frame).unwrap();
        assert_eq!(r.publisher_id, pid("pico_pub_1"));
        assert_eq!(r.temperature, 21.25);
        stamps.push(r.observed_at);
    }
    assert_eq!(stamps, vec![1_700_000_000, 1_700_000_002, 1_700_000_004]);
}

#[test]
fn sensor_glitch_skips_one_tick_only() {
    let mut svc = PublisherService::new(pid("p"), "temp/pico");
    let mut sensor = MockSensor::new(vec![Ok(20.0), Err(SensorError::NotFinite), Ok(22.0)]);
    let clock = ManualClock::at(0);
    let mut wire = loopback();
    let mut sink = RecordingSink::new();

    let outcomes: Vec<_> = (0..3)
        .map(|_| svc.tick(&mut sensor, &clock, &mut wire, &mut sink))
        .collect();
    assert!(matches!(outcomes[1], PublishOutcome::SensorFailed));
    assert_eq!(svc.stats().published, 2);
    assert_eq!(svc.stats().sensor_failures, 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Published(_))), 2);
    assert_eq!(wire.inbox().len(), 2);
}

#[test]
fn disconnected_transport_fails_without_panicking() {
    let mut svc = PublisherService::new(pid("p"), "temp/pico");
    let mut wire = MqttTransport::new("mqtt://sim:1883".into(), "p", 60);
    let out = svc.tick(
        &mut MockSensor::constant(20.0),
        &ManualClock::at(0),
        &mut wire,
        &mut RecordingSink::new(),
    );
    assert_eq!(out, PublishOutcome::TransportFailed);
    assert_eq!(svc.stats().publish_failures, 1);
}
