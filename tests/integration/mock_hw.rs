//! Mock adapters for integration tests.
//!
//! Records every output write and emitted event so tests can assert on the
//! full history without touching real GPIO or a broker.

use std::cell::Cell;

use thermonode::app::events::AppEvent;
use thermonode::app::ports::{ClockPort, EventSink, OutputPort, SensorPort};
use thermonode::app::reading::{PublisherId, Reading};
use thermonode::error::SensorError;

// ── MockOutput ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOutput {
    pub writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }
}

impl OutputPort for MockOutput {
    fn set_output(&mut self, on: bool) {
        self.writes.push(on);
    }
}

// ── MockSensor ────────────────────────────────────────────────

/// Replays a scripted sequence of readings, then repeats the last one.
pub struct MockSensor {
    script: Vec<Result<f32, SensorError>>,
    next: usize,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new(script: Vec<Result<f32, SensorError>>) -> Self {
        Self { script, next: 0 }
    }

    pub fn constant(celsius: f32) -> Self {
        Self::new(vec![Ok(celsius)])
    }
}

impl SensorPort for MockSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let i = self.next.min(self.script.len().saturating_sub(1));
        self.next += 1;
        self.script.get(i).copied().unwrap_or(Err(SensorError::AdcReadFailed))
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// A clock the test moves by hand.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(secs: u64) -> Self {
        Self { now: Cell::new(secs) }
    }

    pub fn set(&self, secs: u64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

impl ClockPort for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.get()
    }
}

impl ClockPort for &ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn evicted(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PublisherEvicted(id) => Some(id.as_str().to_string()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

#[allow(dead_code)]
pub fn pid(id: &str) -> PublisherId {
    PublisherId::new(id).expect("valid publisher id")
}

#[allow(dead_code)]
pub fn reading(id: &str, temperature: f32, observed_at: u64) -> Reading {
    Reading::new(pid(id), temperature, observed_at)
}
