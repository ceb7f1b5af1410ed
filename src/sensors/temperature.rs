//! DS18B20 temperature probe on a single-wire bus.
//!
//! One probe is expected; the first device found on the bus is used.  A
//! missing probe, a bus error or the disconnected sentinel all surface as
//! [`SensorError::ProbeDisconnected`]; the caller substitutes a reporting
//! sentinel and carries on.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the probe through `one-wire-bus` + `ds18b20`.
//! On host/test: reads the raw value (f32 bits) from a static `AtomicU32`.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::SensorError;

/// Value the probe stack reports when the device did not answer.
pub const DISCONNECTED_C: f32 = -127.0;

/// Value substituted for a missing temperature in reports.
pub const ABSENT_REPORT_C: f32 = -1.0;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(DISCONNECTED_C.to_bits());

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature(celsius: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_disconnect_probe() {
    SIM_TEMP_BITS.store(DISCONNECTED_C.to_bits(), Ordering::Relaxed);
}

/// Map a raw probe value onto a reading, rejecting the disconnected sentinel.
pub fn classify(raw_c: f32) -> Result<f32, SensorError> {
    if raw_c.is_nan() || (raw_c - DISCONNECTED_C).abs() < f32::EPSILON {
        Err(SensorError::ProbeDisconnected)
    } else {
        Ok(raw_c)
    }
}

#[cfg(target_os = "espidf")]
pub type ProbePin = esp_idf_svc::hal::gpio::PinDriver<
    'static,
    esp_idf_svc::hal::gpio::AnyIOPin,
    esp_idf_svc::hal::gpio::InputOutput,
>;

pub struct TemperatureSensor {
    #[cfg(target_os = "espidf")]
    bus: Option<one_wire_bus::OneWire<ProbePin>>,
    _bus_gpio: i32,
}

impl TemperatureSensor {
    #[cfg(target_os = "espidf")]
    pub fn new(bus_gpio: i32, pin: ProbePin) -> Self {
        let bus = match one_wire_bus::OneWire::new(pin) {
            Ok(bus) => Some(bus),
            Err(e) => {
                log::warn!("one-wire bus init failed on gpio{}: {:?}", bus_gpio, e);
                None
            }
        };
        Self { bus, _bus_gpio: bus_gpio }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(bus_gpio: i32) -> Self {
        Self { _bus_gpio: bus_gpio }
    }

    /// Request a conversion and read the first probe.
    pub fn measure(&mut self) -> Result<f32, SensorError> {
        classify(self.read_raw())
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> f32 {
        use esp_idf_svc::hal::delay::{Ets, FreeRtos};

        let Some(bus) = self.bus.as_mut() else {
            return DISCONNECTED_C;
        };
        if ds18b20::start_simultaneous_temp_measurement(bus, &mut Ets).is_err() {
            return DISCONNECTED_C;
        }
        // Bounded by the 12-bit conversion time (750 ms worst case).
        ds18b20::Resolution::Bits12.delay_for_measurement_time(&mut FreeRtos);

        let Some(Ok(address)) = bus.devices(false, &mut Ets).next() else {
            return DISCONNECTED_C;
        };
        let Ok(probe) = ds18b20::Ds18b20::new::<esp_idf_svc::sys::EspError>(address) else {
            return DISCONNECTED_C;
        };
        probe
            .read_data(bus, &mut Ets)
            .map_or(DISCONNECTED_C, |data| data.temperature)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> f32 {
        f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed))
    }
}
