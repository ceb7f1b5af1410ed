//! One-shot GPIO initialisation and raw pin helpers.
//!
//! Configures the trigger, echo and relay pins using raw ESP-IDF sys calls.
//! Called once from `main()` before the control loop starts.  The host build
//! keeps output levels in an atomic bitmask so tests can observe them.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU64, Ordering};

use crate::pins;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the control loop; single-threaded.
    unsafe {
        configure(pins::ECHO_GPIO, gpio_mode_t_GPIO_MODE_INPUT)?;
        configure(pins::TRIG_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT)?;
        configure(pins::RELAY_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT)?;
    }
    gpio_write(pins::TRIG_GPIO, false);
    // The relay comes up energized at power-on.
    gpio_write(pins::RELAY_GPIO, true);
    log::info!("hw_init: GPIO configured (trig={}, echo={}, relay={})",
        pins::TRIG_GPIO, pins::ECHO_GPIO, pins::RELAY_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    gpio_write(pins::TRIG_GPIO, false);
    gpio_write(pins::RELAY_GPIO, true);
    log::info!("hw_init(sim): GPIO levels reset");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn configure(pin: i32, mode: gpio_mode_t) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_OUTPUTS: AtomicU64 = AtomicU64::new(0);

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: register read on a pin configured as input in init_peripherals().
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_OUTPUTS.load(Ordering::Relaxed) & (1u64 << pin) != 0
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as output in init_peripherals(); main loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    if high {
        SIM_OUTPUTS.fetch_or(1u64 << pin, Ordering::Relaxed);
    } else {
        SIM_OUTPUTS.fetch_and(!(1u64 << pin), Ordering::Relaxed);
    }
}

/// Output pin configured by [`init_peripherals`], exposed through the
/// `embedded-hal` digital traits so drivers stay generic over the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl embedded_hal::digital::ErrorType for GpioOutput {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, true);
        Ok(())
    }
}

// ── Timing ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    esp_idf_svc::hal::delay::Ets::delay_us(us);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

#[cfg(target_os = "espidf")]
pub fn delay_ms(ms: u32) {
    esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_ms(_ms: u32) {}

/// Width of the next HIGH pulse on `pin` in microseconds.
///
/// Both the wait for the rising edge and the pulse itself are bounded by
/// `timeout_us`; `None` means the edge never came or the line stayed high.
#[cfg(target_os = "espidf")]
pub fn pulse_width_us(pin: i32, timeout_us: u32) -> Option<u32> {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    let now = || unsafe { esp_timer_get_time() };
    let deadline = now() + i64::from(timeout_us);

    while !gpio_read(pin) {
        if now() >= deadline {
            return None;
        }
    }
    let start = now();
    let pulse_deadline = start + i64::from(timeout_us);
    while gpio_read(pin) {
        if now() >= pulse_deadline {
            return None;
        }
    }
    u32::try_from(now() - start).ok()
}
