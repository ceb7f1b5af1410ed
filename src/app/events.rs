//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them.

use crate::control::override_state::ControlMode;
use crate::error::{CommsError, SensorError};
use crate::sensors::Reading;

/// What caused a relay write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaySource {
    /// Threshold policy in automatic mode.
    Auto,
    /// Explicit command in manual mode.
    Manual,
    /// Automatic mode holding the last state over a sensor fault.
    Hold,
}

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(ControlMode),

    /// A fresh sensor reading was taken.
    Reading(Reading),

    /// The relay was driven.
    RelayDriven { energized: bool, source: RelaySource },

    /// Automatic control was suspended or resumed.
    ModeChanged { from: ControlMode, to: ControlMode },

    /// A sensor fault degraded this cycle.
    SensorFault(SensorError),

    /// A telemetry report or dashboard exchange failed.
    ReportFailed(CommsError),

    /// Linking the dashboard failed; retried next cycle.
    LinkFailed(CommsError),

    /// Network or dashboard link changed.
    LinkChanged { network_up: bool, dashboard_linked: bool },
}
