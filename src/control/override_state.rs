//! Manual-override state machine.
//!
//! ```text
//!            enable(true)
//!   ┌──────┐ ──────────▶ ┌────────┐
//!   │ Auto │             │ Manual │ ◀── relay command (applied)
//!   └──────┘ ◀────────── └────────┘
//!      ▲     enable(false)
//!      └── relay command (ignored)
//! ```
//!
//! In `Auto` the threshold policy owns the relay.  In `Manual` only explicit
//! relay commands do.  There is no terminal state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Auto,
    Manual,
}

/// Override flag plus the last relay command accepted in manual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrideState {
    mode: ControlMode,
    commanded_relay: Option<bool>,
}

impl OverrideState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        self.mode == ControlMode::Manual
    }

    /// Last relay state commanded while in manual mode, if any.
    pub fn commanded_relay(&self) -> Option<bool> {
        self.commanded_relay
    }

    /// Apply the override-enable channel.  Returns the new mode when it
    /// changed, `None` when the command was a no-op.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<ControlMode> {
        let next = if enabled {
            ControlMode::Manual
        } else {
            ControlMode::Auto
        };
        if next == self.mode {
            return None;
        }
        self.mode = next;
        if next == ControlMode::Auto {
            self.commanded_relay = None;
        }
        Some(next)
    }

    /// Apply a direct relay command.  Returns the relay state to drive when
    /// accepted (manual mode), `None` when ignored (automatic mode).
    pub fn command_relay(&mut self, energized: bool) -> Option<bool> {
        match self.mode {
            ControlMode::Manual => {
                self.commanded_relay = Some(energized);
                Some(energized)
            }
            ControlMode::Auto => None,
        }
    }
}
