//! Property tests for the registry, aggregator, and frame codec.
//!
//! Runs on host (x86_64) only; proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use std::collections::HashMap;

use proptest::prelude::*;
use thermonode::app::reading::{PUBLISHER_ID_CAPACITY, PublisherId, Reading};
use thermonode::app::registry::PublisherRegistry;
use thermonode::control::average::average;
use thermonode::net::codec;

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,32}"
}

// ── Registry eviction ─────────────────────────────────────────

proptest! {
    /// After eviction every survivor is within the window, and exactly the
    /// entries older than the window were removed.
    #[test]
    fn eviction_removes_exactly_the_stale(
        entries in proptest::collection::vec((0u8..8, 0u64..2_000), 0..40),
        now in 0u64..3_000,
        window in 0u64..1_500,
    ) {
        let mut reg = PublisherRegistry::new();
        let mut model: HashMap<String, u64> = HashMap::new();
        for (n, rx) in &entries {
            let id = format!("node{}", n);
            reg.upsert(Reading::new(PublisherId::new(&id).unwrap(), 20.0, 0), *rx);
            model.insert(id, *rx);
        }

        let mut evicted: Vec<String> =
            reg.evict_stale(now, window).iter().map(|i| i.as_str().to_string()).collect();
        evicted.sort();

        let mut expected: Vec<String> = model
            .iter()
            .filter(|(_, rx)| now.saturating_sub(**rx) > window)
            .map(|(id, _)| id.clone())
            .collect();
        expected.sort();

        prop_assert_eq!(evicted, expected);
        for id in reg.ids() {
            prop_assert!(reg.get(id).unwrap().age(now) <= window);
        }
    }

    /// A second eviction at the same instant removes nothing.
    #[test]
    fn eviction_is_idempotent(
        entries in proptest::collection::vec((0u8..8, 0u64..2_000), 0..40),
        now in 0u64..3_000,
        window in 0u64..1_500,
    ) {
        let mut reg = PublisherRegistry::new();
        for (n, rx) in &entries {
            reg.upsert(Reading::new(PublisherId::new(&format!("n{}", n)).unwrap(), 1.0, 0), *rx);
        }
        reg.evict_stale(now, window);
        let len = reg.len();
        prop_assert!(reg.evict_stale(now, window).is_empty());
        prop_assert_eq!(reg.len(), len);
    }

    /// One entry per publisher, holding the last reading upserted.
    #[test]
    fn upsert_keeps_last_write(
        temps in proptest::collection::vec(-40.0f32..125.0, 1..20),
    ) {
        let mut reg = PublisherRegistry::new();
        let id = PublisherId::new("solo").unwrap();
        for (i, t) in temps.iter().enumerate() {
            reg.upsert(Reading::new(id.clone(), *t, i as u64), i as u64);
        }
        prop_assert_eq!(reg.len(), 1);
        prop_assert_eq!(reg.get(&id).unwrap().reading.temperature, *temps.last().unwrap());
    }
}

// ── Aggregator ────────────────────────────────────────────────

proptest! {
    #[test]
    fn average_lies_between_min_and_max(
        values in proptest::collection::vec(-1_000.0f32..1_000.0, 1..64),
    ) {
        let avg = average(values.iter().copied()).unwrap();
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(avg >= min - 1e-3 && avg <= max + 1e-3, "{} not in [{}, {}]", avg, min, max);
    }

    #[test]
    fn average_ignores_order(
        mut values in proptest::collection::vec(-100.0f32..100.0, 1..32),
    ) {
        let a = average(values.iter().copied()).unwrap();
        values.reverse();
        let b = average(values.iter().copied()).unwrap();
        prop_assert!((a - b).abs() < 1e-3);
    }
}

// ── Codec ─────────────────────────────────────────────────────

proptest! {
    /// Arbitrary bytes never panic the decoder.
    #[test]
    fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = codec::decode(&bytes);
    }

    #[test]
    fn encoded_reading_decodes_to_itself(
        id in id_strategy(),
        temperature in -40.0f32..125.0,
        observed_at in any::<u64>(),
    ) {
        let r = Reading::new(PublisherId::new(&id).unwrap(), temperature, observed_at);
        let frame = codec::encode(&r).unwrap();
        prop_assert!(frame.len() <= codec::MAX_FRAME_LEN);
        prop_assert_eq!(codec::decode(&frame).unwrap(), r);
    }

    /// Any frame with a truncated tail is rejected rather than misread.
    #[test]
    fn truncated_frames_are_rejected(id in id_strategy(), cut in 1usize..8) {
        let r = Reading::new(PublisherId::new(&id).unwrap(), 21.0, 42);
        let frame = codec::encode(&r).unwrap();
        let keep = frame.len().saturating_sub(cut);
        prop_assert!(codec::decode(&frame[..keep]).is_err());
    }
}

#[test]
fn publisher_id_capacity_is_enforced() {
    assert!(PublisherId::new(&"x".repeat(PUBLISHER_ID_CAPACITY)).is_some());
    assert!(PublisherId::new(&"x".repeat(PUBLISHER_ID_CAPACITY + 1)).is_none());
    assert!(PublisherId::new("").is_none());
}
