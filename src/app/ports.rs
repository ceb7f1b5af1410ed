//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (sensors, relay, network, dashboard, telemetry, event
//! sinks) implement these traits.  The
//! [`StationService`](super::service::StationService) consumes them via
//! generics, so the domain core never touches hardware or sockets directly.

use serde::Serialize;

use super::commands::VirtualPin;
use super::mailbox::CommandMailbox;
use crate::error::CommsError;
use crate::sensors::Reading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Measure distance and temperature and derive the level.
    fn read(&mut self) -> Reading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay.
pub trait ActuatorPort {
    /// Drive the relay (`true` = energized).
    fn set_relay(&mut self, energized: bool);

    /// State last written to the relay.
    fn relay_energized(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain ↔ network stack)
// ───────────────────────────────────────────────────────────────

/// Network link maintenance.  `poll` is called at the top of every cycle
/// and must never block for long: reconnects are initiated, not awaited.
pub trait ConnectivityPort {
    fn poll(&mut self);
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Dashboard port (driven adapter: domain ↔ remote dashboard)
// ───────────────────────────────────────────────────────────────

/// Session with the remote dashboard.
///
/// Inbound values are never returned directly: the adapter decodes them
/// into [`RemoteCommand`](super::commands::RemoteCommand)s and posts them to
/// the mailbox, which the service drains at a fixed point of the cycle.
pub trait DashboardPort {
    fn is_linked(&self) -> bool;

    /// Establish the session and replay the last-known values of every
    /// inbound channel into `mailbox`.
    fn link(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError>;

    /// Mark the session as lost; the next `link` re-synchronises.
    fn unlink(&mut self);

    /// Exchange pending traffic; new inbound values go to `mailbox`.
    fn service(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError>;

    /// Update an outbound value channel.
    fn write(&mut self, pin: VirtualPin, value: f32) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → HTTP endpoint)
// ───────────────────────────────────────────────────────────────

/// Body of the telemetry POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryReport {
    pub distance: i32,
    pub level: i32,
    pub temperature: String,
}

impl TelemetryReport {
    /// Build the report for a reading.
    ///
    /// Distance and level are truncated toward zero and read `-1` after an
    /// echo fault.  The temperature is rendered with two decimals, or as
    /// `-1.00` when the probe is absent.
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            distance: reading.distance_or_sentinel() as i32,
            level: reading.level_or_sentinel() as i32,
            temperature: format!("{:.2}", reading.temperature_or_sentinel()),
        }
    }
}

/// Push one report to the telemetry endpoint.  Non-200 answers are errors.
pub trait TelemetryPort {
    fn post(&mut self, report: &TelemetryReport) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
