//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both drivers and produces a fresh [`Reading`] each cycle.

pub mod distance;
pub mod level;
pub mod temperature;

use distance::{ABSENT_REPORT_CM, DistanceSensor};
use level::{ABSENT_REPORT_PCT, SensingBand, to_percentage};
use temperature::{ABSENT_REPORT_C, TemperatureSensor};

use crate::error::SensorError;

/// One cycle's worth of sensor data.  Not retained past the next cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Distance to the liquid surface, or the echo fault.
    pub distance_cm: Result<f32, SensorError>,
    /// Probe temperature, or the disconnect fault.
    pub temperature_c: Result<f32, SensorError>,
    /// Fill level in `[0, 100]`; present exactly when the distance is.
    pub level_pct: Option<f32>,
}

impl Reading {
    /// Derive the level from the raw measurements.
    pub fn new(
        distance_cm: Result<f32, SensorError>,
        temperature_c: Result<f32, SensorError>,
        band: &SensingBand,
    ) -> Self {
        Self {
            distance_cm,
            temperature_c,
            level_pct: distance_cm.ok().map(|d| to_percentage(d, band)),
        }
    }

    pub fn distance(&self) -> Option<f32> {
        self.distance_cm.ok()
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature_c.ok()
    }

    /// Distance with the reporting sentinel substituted on an echo fault.
    pub fn distance_or_sentinel(&self) -> f32 {
        self.distance_cm.unwrap_or(ABSENT_REPORT_CM)
    }

    /// Level with the reporting sentinel substituted on an echo fault.
    pub fn level_or_sentinel(&self) -> f32 {
        self.level_pct.unwrap_or(ABSENT_REPORT_PCT)
    }

    /// Temperature with the reporting sentinel substituted when absent.
    pub fn temperature_or_sentinel(&self) -> f32 {
        self.temperature_c.unwrap_or(ABSENT_REPORT_C)
    }
}

/// Aggregates the sensor drivers.
pub struct SensorHub {
    pub distance: DistanceSensor,
    pub temperature: TemperatureSensor,
    band: SensingBand,
}

impl SensorHub {
    pub fn new(distance: DistanceSensor, temperature: TemperatureSensor, band: SensingBand) -> Self {
        Self {
            distance,
            temperature,
            band,
        }
    }

    /// Read both sensors and derive the level.
    ///
    /// Faults are carried inside the [`Reading`]; nothing here can stop the
    /// control loop.
    pub fn read_all(&mut self) -> Reading {
        let distance = self.distance.measure();
        let temperature = self.temperature.measure();
        Reading::new(distance, temperature, &self.band)
    }
}
