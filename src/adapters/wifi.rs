//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] — the hexagonal boundary for network
//! connectivity.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: an in-memory access point that tests switch on
//!   and off.
//!
//! ## Reconnection policy
//!
//! Connecting is never awaited.  `poll` starts an association and checks on
//! it at the next poll.  If it has not come up within the current backoff
//! window the attempt is restarted and the window doubles (one cycle →
//! two → four … capped by `reconnect_backoff_max_ms`).  A successful
//! association resets the window.

use core::fmt;
use log::{info, warn};

use crate::app::ports::ConnectivityPort;
use crate::config::StationConfig;

use super::time::Esp32TimeAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    /// No association started yet.
    Disconnected,
    /// Association in flight; restarted at `retry_at_ms` if still down.
    Connecting { attempt: u32, retry_at_ms: u64 },
    Connected,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
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
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    initial_backoff_ms: u32,
    max_backoff_ms: u32,
    backoff_ms: u32,
    clock: Esp32TimeAdapter,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
    /// Simulation: whether the access point is reachable.
    #[cfg(not(target_os = "espidf"))]
    sim_ap_up: bool,
    /// Simulation: association established by the last attempt.
    #[cfg(not(target_os = "espidf"))]
    sim_associated: bool,
    /// Simulation: number of association attempts started.
    #[cfg(not(target_os = "espidf"))]
    sim_attempts: u32,
}

impl WifiAdapter {
    /// Configure the STA interface and start the driver.  Does not connect;
    /// the first `poll` does.
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
        config: &StationConfig,
    ) -> anyhow::Result<Self> {
        use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        validate_ssid(&config.wifi_ssid).map_err(anyhow::Error::msg)?;
        validate_password(&config.wifi_pass).map_err(anyhow::Error::msg)?;

        let mut wifi = esp_idf_svc::wifi::EspWifi::new(modem, sysloop, nvs)?;
        let auth_method = if config.wifi_pass.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("{}", ConnectivityError::InvalidSsid))?,
            password: config
                .wifi_pass
                .as_str()
                .try_into()
                .map_err(|_| anyhow::anyhow!("{}", ConnectivityError::InvalidPassword))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("WiFi: driver started (SSID='{}')", config.wifi_ssid);

        let mut ssid = heapless::String::new();
        ssid.push_str(&config.wifi_ssid)
            .map_err(|_| anyhow::anyhow!("{}", ConnectivityError::InvalidSsid))?;
        let initial = config.cycle_interval_ms.max(1);
        Ok(Self {
            state: WifiState::Disconnected,
            ssid,
            initial_backoff_ms: initial,
            max_backoff_ms: config.reconnect_backoff_max_ms.max(initial),
            backoff_ms: initial,
            clock: Esp32TimeAdapter::new(),
            wifi,
        })
    }

    /// Simulated adapter with the access point initially down.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &StationConfig) -> Result<Self, ConnectivityError> {
        validate_ssid(&config.wifi_ssid)?;
        validate_password(&config.wifi_pass)?;
        let mut ssid = heapless::String::new();
        ssid.push_str(&config.wifi_ssid)
            .map_err(|_| ConnectivityError::InvalidSsid)?;
        let initial = config.cycle_interval_ms.max(1);
        Ok(Self {
            state: WifiState::Disconnected,
            ssid,
            initial_backoff_ms: initial,
            max_backoff_ms: config.reconnect_backoff_max_ms.max(initial),
            backoff_ms: initial,
            clock: Esp32TimeAdapter::new(),
            sim_ap_up: false,
            sim_associated: false,
            sim_attempts: 0,
        })
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Current reconnect window.
    pub fn backoff_ms(&self) -> u32 {
        self.backoff_ms
    }

    /// Advance the reconnect state machine as of `now_ms`.
    pub fn poll_at(&mut self, now_ms: u64) {
        if self.platform_is_connected() {
            if self.state != WifiState::Connected {
                info!("WiFi: connected to '{}'", self.ssid);
                self.backoff_ms = self.initial_backoff_ms;
            }
            self.state = WifiState::Connected;
            return;
        }

        match self.state {
            WifiState::Disconnected => self.begin_attempt(0, now_ms),
            WifiState::Connected => {
                warn!("WiFi: connection lost, reconnecting");
                self.backoff_ms = self.initial_backoff_ms;
                self.begin_attempt(0, now_ms);
            }
            WifiState::Connecting {
                attempt,
                retry_at_ms,
            } => {
                if now_ms >= retry_at_ms {
                    self.backoff_ms = self.backoff_ms.saturating_mul(2).min(self.max_backoff_ms);
                    self.begin_attempt(attempt + 1, now_ms);
                }
            }
        }
    }

    fn begin_attempt(&mut self, attempt: u32, now_ms: u64) {
        if attempt > 0 {
            info!(
                "WiFi: reconnect attempt {} (next window {}ms)",
                attempt, self.backoff_ms
            );
        }
        if let Err(e) = self.platform_connect() {
            warn!("WiFi: {}", e);
        }
        self.state = WifiState::Connecting {
            attempt,
            retry_at_ms: now_ms + u64::from(self.backoff_ms),
        };
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        // A connect issued while the previous one is pending is rejected by
        // the driver; disconnecting first restarts the association.
        let _ = self.wifi.disconnect();
        self.wifi
            .connect()
            .map_err(|_| ConnectivityError::ConnectionFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.sim_attempts += 1;
        self.sim_associated = self.sim_ap_up;
        if self.sim_associated {
            Ok(())
        } else {
            Err(ConnectivityError::ConnectionFailed)
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_ap_up && self.sim_associated
    }

    // ── Simulation controls ───────────────────────────────────

    /// Bring the simulated access point up or down.  Going down drops any
    /// association; coming up does not associate until the next attempt.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_ap(&mut self, up: bool) {
        self.sim_ap_up = up;
        if !up {
            self.sim_associated = false;
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_attempts(&self) -> u32 {
        self.sim_attempts
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn poll(&mut self) {
        let now = self.clock.uptime_ms();
        self.poll_at(now);
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
