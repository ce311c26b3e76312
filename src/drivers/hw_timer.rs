//! Periodic tick timer.
//!
//! On ESP-IDF, an `esp_timer` periodic timer raises [`events::TICK`]
//! from the timer task. On simulation targets a background thread sleeps
//! for the period and raises the same signal.
//!
//! [`events::TICK`]: crate::events::TICK

use crate::events::TickSignal;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Errors starting the tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    CreateFailed(i32),
    StartFailed(i32),
}

impl core::fmt::Display for TimerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CreateFailed(rc) => write!(f, "tick timer create failed (rc={})", rc),
            Self::StartFailed(rc) => write!(f, "tick timer start failed (rc={})", rc),
        }
    }
}

impl core::error::Error for TimerError {}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static TickSignal` passed to esp_timer_create.
    let signal = unsafe { &*(arg as *const TickSignal) };
    signal.raise();
}

/// Start a periodic timer raising `signal` every `period_ms`.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(signal: &'static TickSignal, period_ms: u32) -> Result<(), TimerError> {
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    let args = esp_timer_create_args_t {
        callback: Some(tick_cb),
        arg: signal as *const TickSignal as *mut core::ffi::c_void,
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"tick".as_ptr(),
        skip_unhandled_events: true,
    };
    // SAFETY: called once at boot from the main task; the handle is kept
    // alive for the life of the process (the timer is never stopped).
    unsafe {
        let ret = esp_timer_create(&args, &mut handle);
        if ret != ESP_OK as i32 {
            return Err(TimerError::CreateFailed(ret));
        }
        let ret = esp_timer_start_periodic(handle, u64::from(period_ms) * 1_000);
        if ret != ESP_OK as i32 {
            return Err(TimerError::StartFailed(ret));
        }
    }
    log::info!("hw_timer: tick every {}ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(signal: &'static TickSignal, period_ms: u32) -> Result<(), TimerError> {
    let period = std::time::Duration::from_millis(u64::from(period_ms));
    std::thread::Builder::new()
        .name("tick".into())
        .spawn(move || {
            loop {
                std::thread::sleep(period);
                signal.raise();
            }
        })
        .map_err(|_| TimerError::CreateFailed(-1))?;
    log::info!("hw_timer(sim): tick thread every {}ms", period_ms);
    Ok(())
}
