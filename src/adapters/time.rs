//! ESP32 time adapter.
//!
//! Monotonic uptime for cycle pacing and reconnect backoff.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()`.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant`.

pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since the adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Milliseconds left of a `period_ms` slot that began at `started_ms`.
    pub fn remaining_ms(&self, started_ms: u64, period_ms: u32) -> u32 {
        slot_remaining_ms(self.uptime_ms(), started_ms, period_ms)
    }
}

/// Time left in a slot at `now_ms`; zero once the slot has overrun.
pub fn slot_remaining_ms(now_ms: u64, started_ms: u64, period_ms: u32) -> u32 {
    let elapsed = now_ms.saturating_sub(started_ms);
    u64::from(period_ms).saturating_sub(elapsed) as u32
}
