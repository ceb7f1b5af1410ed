//! Inbound commands to the control service and the dashboard channel map.
//!
//! Commands arrive from the dashboard adapter through the
//! [`CommandMailbox`](super::mailbox::CommandMailbox) and are applied by the
//! [`StationService`](super::service::StationService) once per cycle.

/// Dashboard virtual channels used by the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VirtualPin {
    /// In: manual relay command.  Out: relay status.
    Relay = 0,
    /// Out: distance to surface (cm).
    Distance = 1,
    /// Out: probe temperature (°C).
    Temperature = 2,
    /// Out: fill level (%).
    Level = 3,
    /// In: manual-override enable flag.
    OverrideEnable = 4,
}

impl VirtualPin {
    /// Channels the station reads commands from, in replay order: the
    /// override flag must land before the relay command it gates.
    pub const INBOUND: [VirtualPin; 2] = [VirtualPin::OverrideEnable, VirtualPin::Relay];

    pub fn label(self) -> &'static str {
        match self {
            Self::Relay => "V0",
            Self::Distance => "V1",
            Self::Temperature => "V2",
            Self::Level => "V3",
            Self::OverrideEnable => "V4",
        }
    }
}

/// Commands the dashboard can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Enable (`true`) or disable manual override.
    SetOverride(bool),
    /// Drive the relay directly; only honoured in manual mode.
    SetRelay { energized: bool },
}

impl RemoteCommand {
    /// Decode an integer written to an inbound virtual channel.
    ///
    /// Override: `1` enables, anything else disables.  Relay: `0`
    /// energizes, anything else de-energizes.
    pub fn from_pin_value(pin: VirtualPin, value: i64) -> Option<Self> {
        match pin {
            VirtualPin::OverrideEnable => Some(Self::SetOverride(value == 1)),
            VirtualPin::Relay => Some(Self::SetRelay { energized: value == 0 }),
            _ => None,
        }
    }
}

/// Value written to [`VirtualPin::Relay`] to report the relay state.
/// Uses the same encoding as inbound commands.
pub fn relay_status_value(energized: bool) -> i64 {
    if energized { 0 } else { 1 }
}
