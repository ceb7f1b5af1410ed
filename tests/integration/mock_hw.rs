//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! without touching GPIO, Wi-Fi or sockets.

use std::collections::VecDeque;

use levelstation::app::commands::{RemoteCommand, VirtualPin};
use levelstation::app::events::AppEvent;
use levelstation::app::mailbox::CommandMailbox;
use levelstation::app::ports::{
    ActuatorPort, ConnectivityPort, DashboardPort, EventSink, SensorPort, TelemetryPort,
    TelemetryReport,
};
use levelstation::error::{CommsError, SensorError};
use levelstation::sensors::Reading;
use levelstation::sensors::level::SensingBand;

// ── MockHardware ──────────────────────────────────────────────

/// Serves scripted readings (the last one repeats) and records relay writes.
pub struct MockHardware {
    readings: VecDeque<Reading>,
    last: Reading,
    relay: bool,
    pub relay_writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(distance_cm: f32, temperature_c: f32) -> Self {
        Self {
            readings: VecDeque::new(),
            last: reading(Ok(distance_cm), Ok(temperature_c)),
            // Relay comes up energized, as the board does.
            relay: true,
            relay_writes: Vec::new(),
        }
    }

    /// Queue readings served one per cycle before falling back to the last.
    pub fn script(&mut self, readings: impl IntoIterator<Item = Reading>) {
        self.readings.extend(readings);
    }

    pub fn set_reading(&mut self, r: Reading) {
        self.readings.clear();
        self.last = r;
    }

    pub fn relay(&self) -> bool {
        self.relay
    }

    /// Change the relay level behind the service's back.
    pub fn set_relay_for_test(&mut self, energized: bool) {
        self.relay = energized;
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Reading {
        if let Some(r) = self.readings.pop_front() {
            self.last = r;
        }
        self.last
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, energized: bool) {
        self.relay = energized;
        self.relay_writes.push(energized);
    }

    fn relay_energized(&self) -> bool {
        self.relay
    }
}

pub fn reading(distance: Result<f32, SensorError>, temperature: Result<f32, SensorError>) -> Reading {
    Reading::new(distance, temperature, &SensingBand::default())
}

// ── MockNetwork ───────────────────────────────────────────────

pub struct MockNetwork {
    pub up: bool,
    pub polls: u32,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn up() -> Self {
        Self { up: true, polls: 0 }
    }

    pub fn down() -> Self {
        Self { up: false, polls: 0 }
    }
}

impl ConnectivityPort for MockNetwork {
    fn poll(&mut self) {
        self.polls += 1;
    }

    fn is_connected(&self) -> bool {
        self.up
    }
}

// ── MockDashboard ─────────────────────────────────────────────

/// In-memory dashboard.  `remote` holds the server-side value of each
/// inbound channel; `set_remote` also queues the change for the next
/// `service`, the way a user flipping a widget would.
pub struct MockDashboard {
    linked: bool,
    remote_override: Option<i64>,
    remote_relay: Option<i64>,
    pending: Vec<(VirtualPin, i64)>,
    pub links: u32,
    pub writes: Vec<(VirtualPin, f32)>,
    pub fail_service: bool,
    /// Refuse the next `n` link attempts.
    pub fail_links: u32,
}

#[allow(dead_code)]
impl MockDashboard {
    pub fn new() -> Self {
        Self {
            linked: false,
            remote_override: None,
            remote_relay: None,
            pending: Vec::new(),
            links: 0,
            writes: Vec::new(),
            fail_service: false,
            fail_links: 0,
        }
    }

    pub fn set_remote(&mut self, pin: VirtualPin, value: i64) {
        match pin {
            VirtualPin::OverrideEnable => self.remote_override = Some(value),
            VirtualPin::Relay => self.remote_relay = Some(value),
            _ => return,
        }
        self.pending.push((pin, value));
    }

    /// Values written to `pin`, oldest first.
    pub fn written(&self, pin: VirtualPin) -> Vec<f32> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl Default for MockDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPort for MockDashboard {
    fn is_linked(&self) -> bool {
        self.linked
    }

    fn link(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError> {
        self.links += 1;
        if self.fail_links > 0 {
            self.fail_links -= 1;
            return Err(CommsError::DashboardRejected(401));
        }
        self.linked = true;
        self.pending.clear();
        for pin in VirtualPin::INBOUND {
            let value = match pin {
                VirtualPin::OverrideEnable => self.remote_override,
                _ => self.remote_relay,
            };
            if let Some(cmd) = value.and_then(|v| RemoteCommand::from_pin_value(pin, v)) {
                mailbox.post(cmd);
            }
        }
        Ok(())
    }

    fn unlink(&mut self) {
        self.linked = false;
    }

    fn service(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError> {
        if self.fail_service {
            return Err(CommsError::Timeout);
        }
        for (pin, value) in self.pending.drain(..) {
            if let Some(cmd) = RemoteCommand::from_pin_value(pin, value) {
                mailbox.post(cmd);
            }
        }
        Ok(())
    }

    fn write(&mut self, pin: VirtualPin, value: f32) -> Result<(), CommsError> {
        if !self.linked {
            return Err(CommsError::NotConnected);
        }
        if pin == VirtualPin::Relay {
            self.remote_relay = Some(value as i64);
        }
        self.writes.push((pin, value));
        Ok(())
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

pub struct MockTelemetry {
    pub reports: Vec<TelemetryReport>,
    pub attempts: u32,
    failures: VecDeque<CommsError>,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            attempts: 0,
            failures: VecDeque::new(),
        }
    }

    /// Fail the next `n` posts with `err`.
    pub fn fail_next(&mut self, n: usize, err: CommsError) {
        self.failures.extend(std::iter::repeat_n(err, n));
    }
}

impl Default for MockTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryPort for MockTelemetry {
    fn post(&mut self, report: &TelemetryReport) -> Result<(), CommsError> {
        self.attempts += 1;
        if let Some(err) = self.failures.pop_front() {
            return Err(err);
        }
        self.reports.push(report.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
