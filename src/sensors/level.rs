//! Distance → fill level conversion.
//!
//! The ultrasonic sensor sits above the liquid, so a shorter distance means
//! a fuller tank.  Distances are mapped linearly across a sensing band and
//! the result is clamped so sensor noise can never produce a level outside
//! 0–100 %.

/// Level substituted in reports when there is no distance to derive it from.
pub const ABSENT_REPORT_PCT: f32 = -1.0;

/// Usable sensing band of the ultrasonic sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensingBand {
    /// Distance (cm) that reads as a full tank.
    pub near_cm: f32,
    /// Distance (cm) that reads as an empty tank.
    pub far_cm: f32,
}

impl SensingBand {
    pub const fn new(near_cm: f32, far_cm: f32) -> Self {
        Self { near_cm, far_cm }
    }

    /// Effective range of the band in centimetres.
    pub fn span_cm(&self) -> f32 {
        self.far_cm - self.near_cm
    }
}

impl Default for SensingBand {
    fn default() -> Self {
        Self::new(10.0, 100.0)
    }
}

/// Convert a distance reading to a fill percentage in `[0, 100]`.
///
/// NaN (and a degenerate band) reads as empty.
pub fn to_percentage(distance_cm: f32, band: &SensingBand) -> f32 {
    let span = band.span_cm();
    if span <= 0.0 {
        return 0.0;
    }
    let raw = (distance_cm - band.near_cm) / span * 100.0;
    let pct = 100.0 - raw;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}
