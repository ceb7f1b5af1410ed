//! Station configuration parameters.
//!
//! Credentials and endpoints are baked in at build time (see `build.rs`);
//! everything else has a compiled-in default.  Nothing is persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sensors::level::SensingBand;

const DEFAULT_TELEMETRY_URL: &str = "http://192.168.217.101:3000/api/information";
const DEFAULT_DASHBOARD_URL: &str = "http://blynk.cloud";

/// Core station configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Level sensing ---
    /// Distance (cm) at which the tank reads 100 %.
    pub near_cm: f32,
    /// Distance (cm) at which the tank reads 0 %.
    pub far_cm: f32,
    /// Distances strictly below this energize the relay in automatic mode.
    pub close_threshold_cm: f32,
    /// Upper bound on the echo wait (µs).
    pub echo_timeout_us: u32,

    // --- Timing ---
    /// Full control cycle period (ms), split into two equal phases.
    pub cycle_interval_ms: u32,
    /// Upper bound for any single HTTP request (ms).
    pub http_timeout_ms: u32,
    /// Cap for the Wi-Fi reconnect backoff (ms).
    pub reconnect_backoff_max_ms: u32,

    // --- Reporting ---
    /// Telemetry endpoint receiving the JSON POST.
    pub telemetry_url: String,
    /// Extra POST attempts after a failed report (0 = fire and forget).
    pub report_retries: u8,
    /// Base URL of the dashboard device API.
    pub dashboard_url: String,
    /// Device auth token for the dashboard.
    pub dashboard_token: String,

    // --- Network ---
    pub wifi_ssid: String,
    pub wifi_pass: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            near_cm: 10.0,
            far_cm: 100.0,
            close_threshold_cm: 10.0,
            echo_timeout_us: 30_000, // ~5 m round trip

            cycle_interval_ms: 500,
            http_timeout_ms: 5_000,
            reconnect_backoff_max_ms: 30_000,

            telemetry_url: option_env!("TELEMETRY_URL")
                .unwrap_or(DEFAULT_TELEMETRY_URL)
                .into(),
            report_retries: 0,
            dashboard_url: DEFAULT_DASHBOARD_URL.into(),
            dashboard_token: option_env!("DASHBOARD_TOKEN").unwrap_or("").into(),

            wifi_ssid: option_env!("WIFI_SSID").unwrap_or("internet").into(),
            wifi_pass: option_env!("WIFI_PASS").unwrap_or("password").into(),
        }
    }
}

impl StationConfig {
    /// The level converter band described by `near_cm`/`far_cm`.
    pub fn band(&self) -> SensingBand {
        SensingBand::new(self.near_cm, self.far_cm)
    }

    /// Half of the cycle period; the loop sleeps this long before the work of
    /// each cycle and spends whatever is left of the period after it.
    pub fn phase_ms(&self) -> u32 {
        self.cycle_interval_ms / 2
    }

    /// Reject values that would make the control loop misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near_cm.is_finite() && self.far_cm.is_finite()) || self.near_cm < 0.0 {
            return Err(ConfigError::ValidationFailed("sensing band must be finite and non-negative"));
        }
        if self.far_cm <= self.near_cm {
            return Err(ConfigError::ValidationFailed("far_cm must be greater than near_cm"));
        }
        if !self.close_threshold_cm.is_finite() || self.close_threshold_cm < 0.0 {
            return Err(ConfigError::ValidationFailed("close_threshold_cm must be non-negative"));
        }
        if self.echo_timeout_us == 0 {
            return Err(ConfigError::ValidationFailed("echo_timeout_us must be non-zero"));
        }
        if self.cycle_interval_ms < 2 {
            return Err(ConfigError::ValidationFailed("cycle_interval_ms must be at least 2"));
        }
        if self.http_timeout_ms == 0 || self.reconnect_backoff_max_ms == 0 {
            return Err(ConfigError::ValidationFailed("timeouts must be non-zero"));
        }
        if self.telemetry_url.is_empty() || self.dashboard_url.is_empty() {
            return Err(ConfigError::ValidationFailed("endpoint URLs must not be empty"));
        }
        if !is_url_safe_token(&self.dashboard_token) {
            return Err(ConfigError::ValidationFailed(
                "dashboard_token may only contain A-Z a-z 0-9 - _ . ~",
            ));
        }
        if self.wifi_ssid.is_empty() || self.wifi_ssid.len() > 32 {
            return Err(ConfigError::ValidationFailed("wifi_ssid must be 1-32 bytes"));
        }
        if self.wifi_pass.len() > 64 {
            return Err(ConfigError::ValidationFailed("wifi_pass must be at most 64 bytes"));
        }
        Ok(())
    }
}

/// The dashboard token is placed into request query strings verbatim, so
/// only RFC 3986 unreserved characters are accepted.
pub fn is_url_safe_token(token: &str) -> bool {
    token
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

/// Errors from [`StationConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation; the message names which one.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
