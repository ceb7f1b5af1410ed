//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the [`RelayDriver`], exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::hw_init::GpioOutput;
use crate::drivers::relay::RelayDriver;
use crate::sensors::{Reading, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    relay: RelayDriver<GpioOutput>,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, relay: RelayDriver<GpioOutput>) -> Self {
        Self { sensor_hub, relay }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read(&mut self) -> Reading {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, energized: bool) {
        self.relay.set(energized);
    }

    fn relay_energized(&self) -> bool {
        self.relay.state().energized
    }
}
