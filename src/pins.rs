//! GPIO pin assignments for the level station board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Ultrasonic distance sensor (HC-SR04 style)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const TRIG_GPIO: i32 = 25;
/// Digital input: HIGH for the duration of the echo round trip.
pub const ECHO_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Relay (pump / valve)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = energized (closed).
pub const RELAY_GPIO: i32 = 33;

// ---------------------------------------------------------------------------
// Temperature probe
// ---------------------------------------------------------------------------

/// Single-wire bus carrying the DS18B20 probe (open drain, pulled up).
pub const ONE_WIRE_GPIO: i32 = 14;
