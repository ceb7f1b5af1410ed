//! HC-SR04 style ultrasonic distance sensor.
//!
//! A 10 µs HIGH pulse on the trigger pin starts a measurement; the echo pin
//! then stays HIGH for the round-trip time of the sound burst.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the trigger and times the echo via hw_init helpers.
//! On host/test: the echo width comes from a static `AtomicU32` for
//! injection (0 = no echo).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_US: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(us: u32) {
    SIM_ECHO_US.store(us, Ordering::Relaxed);
}

/// Distance substituted in reports when the echo faulted.
pub const ABSENT_REPORT_CM: f32 = -1.0;

/// Speed of sound in air (m/s).
const SOUND_SPEED_M_PER_S: f32 = 340.0;
/// Converts µs·(m/s) into centimetres.
const US_M_PER_S_TO_CM: f32 = 0.0001;

const TRIG_SETTLE_MS: u32 = 2;
const TRIG_PULSE_US: u32 = 10;

/// Convert an echo round-trip time to a one-way distance in centimetres.
pub fn echo_to_cm(echo_us: u32) -> f32 {
    echo_us as f32 * SOUND_SPEED_M_PER_S / 2.0 * US_M_PER_S_TO_CM
}

pub struct DistanceSensor {
    timeout_us: u32,
    trig_gpio: i32,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    echo_gpio: i32,
}

impl DistanceSensor {
    pub fn new(trig_gpio: i32, echo_gpio: i32, timeout_us: u32) -> Self {
        Self {
            timeout_us,
            trig_gpio,
            echo_gpio,
        }
    }

    /// Fire one ping and return the distance to the surface.
    ///
    /// A missing or zero-width echo is a fault, not a zero distance.
    pub fn measure(&mut self) -> Result<f32, SensorError> {
        self.trigger();
        match self.echo_width_us() {
            Some(us) if us > 0 => Ok(echo_to_cm(us)),
            _ => Err(SensorError::EchoTimeout),
        }
    }

    fn trigger(&self) {
        hw_init::gpio_write(self.trig_gpio, false);
        hw_init::delay_ms(TRIG_SETTLE_MS);
        hw_init::gpio_write(self.trig_gpio, true);
        hw_init::delay_us(TRIG_PULSE_US);
        hw_init::gpio_write(self.trig_gpio, false);
    }

    #[cfg(target_os = "espidf")]
    fn echo_width_us(&self) -> Option<u32> {
        hw_init::pulse_width_us(self.echo_gpio, self.timeout_us)
    }

    #[cfg(not(target_os = "espidf"))]
    fn echo_width_us(&self) -> Option<u32> {
        let us = SIM_ECHO_US.load(Ordering::Relaxed);
        (us <= self.timeout_us).then_some(us)
    }
}
