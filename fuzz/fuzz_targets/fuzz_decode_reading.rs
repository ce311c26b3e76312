//! Fuzz target: `codec::decode`
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every accepted frame carries a valid publisher id
//! - Every accepted reading survives a re-encode unchanged
//!
//! cargo fuzz run fuzz_decode_reading

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermonode::app::reading::PUBLISHER_ID_CAPACITY;
use thermonode::net::codec;

fuzz_target!(|data: &[u8]| {
    let Ok(reading) = codec::decode(data) else {
        return;
    };
    let id = reading.publisher_id.as_str();
    assert!(!id.is_empty() && id.len() <= PUBLISHER_ID_CAPACITY);

    if reading.temperature.is_nan() {
        return;
    }
    let again = codec::encode(&reading).expect("decoded reading must re-encode");
    assert_eq!(codec::decode(&again), Ok(reading));
});
