//! Error types shared by the sensor and communications layers.
//!
//! All variants are `Copy` so they can be carried inside application events
//! without allocation.  Peripheral bring-up has its own
//! [`HwInitError`](crate::drivers::hw_init::HwInitError).

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No echo edge arrived within the timeout, or the pulse had zero width.
    EchoTimeout,
    /// The temperature probe reported the disconnected sentinel or did not
    /// answer on the bus.
    ProbeDisconnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoTimeout => write!(f, "ultrasonic echo timed out"),
            Self::ProbeDisconnected => write!(f, "temperature probe disconnected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The network link is down; nothing was sent.
    NotConnected,
    /// The request could not be sent or the connection dropped mid-way.
    RequestFailed,
    /// The peer did not answer within the configured timeout.
    Timeout,
    /// The telemetry endpoint answered with a non-200 status.
    ReportRejected(u16),
    /// The dashboard API answered with a non-200 status.
    DashboardRejected(u16),
    /// The response body could not be parsed.
    MalformedResponse,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "network not connected"),
            Self::RequestFailed => write!(f, "request failed"),
            Self::Timeout => write!(f, "request timed out"),
            Self::ReportRejected(status) => write!(f, "report rejected (HTTP {status})"),
            Self::DashboardRejected(status) => write!(f, "dashboard rejected (HTTP {status})"),
            Self::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
