//! Aggregator for live publisher readings
//!
//! Plain arithmetic mean. An empty input yields `None` rather than 0.0 so
//! that "no publishers" can never be mistaken for "cold".

/// Mean of `values`, or `None` if there are none.
///
/// Accumulates in `f64` so a long tail of readings does not drift.
pub fn average(values: impl IntoIterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, n), v| (sum + f64::from(v), n + 1));
    if count == 0 {
        None
    } else {
        Some((sum / f64::from(count)) as f32)
    }
}
