//! Fuzz target: the subscriber pipeline over a stream of arbitrary frames.
//!
//! Input is split into `[len:u8][rx_delta:u8][frame..len]` records; each
//! record is fed through `SubscriberService::handle_frame`.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - After every frame, no registry entry is older than the window
//! - The output is only written after a successful decode
//!
//! cargo fuzz run fuzz_subscriber_ingest

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermonode::app::events::AppEvent;
use thermonode::app::ports::{EventSink, OutputPort};
use thermonode::app::subscriber::SubscriberService;

const WINDOW: u64 = 60;

#[derive(Default)]
struct Pin(usize);
impl OutputPort for Pin {
    fn set_output(&mut self, _on: bool) {
        self.0 += 1;
    }
}

struct Null;
impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut svc = SubscriberService::new(25.0, WINDOW);
    let mut pin = Pin::default();
    svc.start(&mut pin);

    let mut now: u64 = 0;
    let mut rest = data;
    while let [len, delta, tail @ ..] = rest {
        let n = (*len as usize).min(tail.len());
        let (frame, next) = tail.split_at(n);
        rest = next;
        now += u64::from(*delta);

        let writes_before = pin.0;
        let ok = svc.handle_frame(frame, now, &mut pin, &mut Null).is_ok();
        if !ok {
            assert_eq!(pin.0, writes_before);
        }
        for id in svc.registry().ids() {
            let entry = svc.registry().get(id).expect("listed id must exist");
            assert!(entry.age(now) <= WINDOW);
        }
    }
});
