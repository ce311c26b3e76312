//! ESP32 clock adapters.
//!
//! - [`UptimeClock`]: seconds since boot. Subscribers stamp arrivals with it.
//! - [`WallClock`]: seconds since the Unix epoch. Publishers stamp
//!   readings with it; before SNTP sync it reads close to zero.
//!
//! On `target_os = "espidf"` uptime wraps `esp_timer_get_time()`;
//! elsewhere it uses `std::time::Instant` for host-side testing.

use crate::app::ports::ClockPort;

/// Monotonic seconds since boot.
pub struct UptimeClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_secs(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl ClockPort for UptimeClock {
    fn now_secs(&self) -> u64 {
        self.uptime_secs()
    }
}

/// System wall clock, whole seconds since the Unix epoch.
#[derive(Default)]
pub struct WallClock;

impl ClockPort for WallClock {
    fn now_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}
