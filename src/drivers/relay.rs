//! Relay driver for the pump / valve actuator.
//!
//! Energized drives the relay pin HIGH ("closed"); de-energized drives it
//! LOW ("opened").  This driver is a dumb actuator: which state to pick is
//! decided by the control service.
//!
//! Generic over any `embedded-hal` output pin.  The firmware uses
//! [`GpioOutput`](super::hw_init::GpioOutput); tests pass a recording pin.

use embedded_hal::digital::OutputPin;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayState {
    pub energized: bool,
}

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    state: RelayState,
}

impl<P: OutputPin> RelayDriver<P> {
    /// The relay is assumed energized at boot; `hw_init` drives it HIGH.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: RelayState { energized: true },
        }
    }

    pub fn set(&mut self, energized: bool) {
        let result = if energized {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("Relay pin write failed: {:?}", e);
        }
        self.state = RelayState { energized };
    }

    /// Last state written to the pin.
    pub fn state(&self) -> RelayState {
        self.state
    }
}
