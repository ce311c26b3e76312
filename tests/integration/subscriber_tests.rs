//! Subscriber pipeline tests: decode → upsert → evict → average → output.

use thermonode::app::events::AppEvent;
use thermonode::app::subscriber::{PollOutcome, SubscriberService};
use thermonode::control::threshold::Actuation;
use thermonode::error::CodecError;
use thermonode::net::codec;

use crate::mock_hw::{MockOutput, RecordingSink, pid, reading};

fn frame(id: &str, temperature: f32, observed_at: u64) -> Vec<u8> {
    codec::encode(&reading(id, temperature, observed_at)).unwrap()
}

fn started() -> (SubscriberService, MockOutput, RecordingSink) {
    let mut svc = SubscriberService::new(25.0, 600);
    let mut out = MockOutput::new();
    svc.start(&mut out);
    (svc, out, RecordingSink::new())
}

#[test]
fn two_publishers_eviction_flips_output() {
    let (mut svc, mut out, mut sink) = started();

    svc.handle_frame(&frame("A", 20.0, 0), 0, &mut out, &mut sink).unwrap();
    svc.handle_frame(&frame("B", 30.0, 0), 0, &mut out, &mut sink).unwrap();
    // avg 25.0 is not above the threshold
    assert!(!out.is_on());
    assert_eq!(svc.stats().last_average_c, Some(25.0));

    // B keeps reporting, A goes silent
    svc.handle_frame(&frame("B", 30.0, 300), 300, &mut out, &mut sink).unwrap();
    let act = svc
        .handle_frame(&frame("B", 30.0, 601), 601, &mut out, &mut sink)
        .unwrap();

    assert_eq!(sink.evicted(), vec!["A".to_string()]);
    assert!(!svc.registry().contains(&pid("A")));
    assert_eq!(act, Actuation::Applied { on: true, changed: true });
    assert!(out.is_on());
}

#[test]
fn entry_exactly_at_window_survives() {
    let (mut svc, mut out, mut sink) = started();
    svc.handle_frame(&frame("A", 20.0, 0), 0, &mut out, &mut sink).unwrap();
    svc.handle_frame(&frame("B", 30.0, 600), 600, &mut out, &mut sink).unwrap();
    assert_eq!(svc.registry().len(), 2);
    assert!(sink.evicted().is_empty());
}

#[test]
fn out_of_order_reading_overwrites() {
    let (mut svc, mut out, mut sink) = started();
    svc.handle_frame(&frame("A", 30.0, 100), 10, &mut out, &mut sink).unwrap();
    svc.handle_frame(&frame("A", 20.0, 50), 11, &mut out, &mut sink).unwrap();

    let entry = svc.registry().get(&pid("A")).unwrap();
    assert_eq!(entry.reading.observed_at, 50);
    assert_eq!(entry.received_at, 11);
    assert!(!out.is_on());
}

#[test]
fn garbage_frames_are_dropped_silently() {
    let (mut svc, mut out, mut sink) = started();
    svc.handle_frame(&frame("A", 30.0, 0), 0, &mut out, &mut sink).unwrap();
    let writes = out.writes.len();

    for bad in [&[][..], &[0x02, 0x00][..], &[codec::FRAME_VERSION, 0xff, 0xff][..]] {
        assert!(svc.handle_frame(bad, 1, &mut out, &mut sink).is_err());
    }
    assert_eq!(svc.registry().len(), 1);
    assert_eq!(out.writes.len(), writes);
    assert_eq!(svc.stats().decode_failures, 3);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::DecodeFailed(CodecError::Empty))),
        1
    );
}

#[test]
fn fresh_subscriber_drives_output_off_and_holds() {
    let (svc, out, _sink) = started();
    assert_eq!(out.writes, vec![false]);
    assert_eq!(svc.output_on(), Some(false));
    assert!(svc.registry().is_empty());
}

#[test]
fn idle_tick_leaves_output_alone() {
    use thermonode::adapters::mqtt::MqttTransport;
    use thermonode::net::transport::TransportPort;

    use crate::mock_hw::ManualClock;

    let (mut svc, mut out, mut sink) = started();
    let mut wire = MqttTransport::new("mqtt://sim:1883".into(), "subscriber", 60);
    wire.connect().unwrap();
    wire.subscribe("temp/pico").unwrap();

    let clock = ManualClock::at(0);
    assert_eq!(svc.tick(&mut wire, &clock, &mut out, &mut sink), PollOutcome::Idle);

    wire.inject(&frame("A", 40.0, 0));
    assert_eq!(
        svc.tick(&mut wire, &clock, &mut out, &mut sink),
        PollOutcome::Processed(Actuation::Applied { on: true, changed: true })
    );

    // A ages past the window but no frame arrives: nothing changes
    clock.advance(10_000);
    assert_eq!(svc.tick(&mut wire, &clock, &mut out, &mut sink), PollOutcome::Idle);
    assert!(out.is_on());
    assert_eq!(svc.registry().len(), 1);
}
