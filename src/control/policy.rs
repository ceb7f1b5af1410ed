//! Automatic relay policy.

/// Relay state the automatic policy wants for a distance reading.
///
/// The surface closer than `threshold_cm` means the tank is full: energize
/// to stop the flow.  Anything else de-energizes.
pub fn relay_for_distance(distance_cm: f32, threshold_cm: f32) -> bool {
    distance_cm < threshold_cm
}
