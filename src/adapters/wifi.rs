//! WiFi station-mode adapter.
//!
//! Associates once at boot and blocks until the link is up, retrying every
//! second. Nothing useful can happen without the network, so there is no
//! give-up path.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests.

use core::fmt;
use log::info;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    DriverInitFailed,
    StartFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::DriverInitFailed => write!(f, "WiFi driver init failed"),
            Self::StartFailed => write!(f, "WiFi start failed"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

/// Delay between association attempts.
pub const RETRY_DELAY_MS: u64 = 1_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiAdapter {
    wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    pub fn new(
        modem: esp_idf_svc::hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    ) -> Result<Self, ConnectivityError> {
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)
            .map_err(|_| ConnectivityError::DriverInitFailed)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop)
            .map_err(|_| ConnectivityError::DriverInitFailed)?;
        Ok(Self { wifi })
    }

    /// Associate with `ssid`, retrying every [`RETRY_DELAY_MS`] until the
    /// network interface is up.
    pub fn connect_blocking(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        validate_ssid(ssid)?;
        validate_password(password)?;

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: password
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&cfg)
            .map_err(|_| ConnectivityError::StartFailed)?;
        self.wifi.start().map_err(|_| ConnectivityError::StartFailed)?;

        info!("WiFi: connecting to '{}'", ssid);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
                Ok(()) => break,
                Err(e) => {
                    log::warn!("WiFi: attempt {} failed ({}), retrying", attempt, e);
                    std::thread::sleep(std::time::Duration::from_millis(RETRY_DELAY_MS));
                }
            }
        }

        if let Ok(ip) = self.wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: connected, IP {}", ip.ip);
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter (simulation)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct WifiAdapter {
    connected: bool,
    /// Simulation: number of attempts that fail before association succeeds.
    pub sim_failures_before_connect: u32,
    attempts: u32,
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate with `ssid`, retrying until the simulated link comes up.
    /// The simulation does not sleep between attempts.
    pub fn connect_blocking(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        info!("WiFi(sim): connecting to '{}'", ssid);
        loop {
            self.attempts += 1;
            if self.attempts > self.sim_failures_before_connect {
                break;
            }
            log::warn!("WiFi(sim): attempt {} failed, retrying", self.attempts);
        }
        self.connected = true;
        info!("WiFi(sim): connected after {} attempt(s)", self.attempts);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
