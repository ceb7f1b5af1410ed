//! Station service — the hexagonal core.
//!
//! [`StationService`] owns the override state machine, the command mailbox
//! and the connection bookkeeping.  All I/O flows through port traits
//! injected at call sites, so the whole cycle runs against mock adapters
//! in tests.
//!
//! ```text
//!     SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │      StationService       │
//!   ActuatorPort ◀── │ Override · Policy · Sync  │ ──▶ TelemetryPort
//!                    └──────────────────────────┘
//!  ConnectivityPort ──▲            ▲▼── DashboardPort
//! ```

use log::{debug, info, warn};

use crate::config::StationConfig;
use crate::control::override_state::{ControlMode, OverrideState};
use crate::control::policy::relay_for_distance;
use crate::error::CommsError;
use crate::sensors::Reading;

use super::commands::{RemoteCommand, VirtualPin, relay_status_value};
use super::events::{AppEvent, RelaySource};
use super::mailbox::CommandMailbox;
use super::ports::{
    ActuatorPort, ConnectivityPort, DashboardPort, EventSink, SensorPort, TelemetryPort,
    TelemetryReport,
};

/// Network and dashboard link status as seen by the last cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub network_up: bool,
    pub dashboard_linked: bool,
}

// ───────────────────────────────────────────────────────────────
// StationService
// ───────────────────────────────────────────────────────────────

pub struct StationService {
    config: StationConfig,
    overrides: OverrideState,
    mailbox: CommandMailbox,
    connection: ConnectionState,
    last_reading: Option<Reading>,
    cycle_count: u64,
}

impl StationService {
    /// Construct the service.  Starts in automatic mode, disconnected.
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            overrides: OverrideState::new(),
            mailbox: CommandMailbox::new(),
            connection: ConnectionState::default(),
            last_reading: None,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.overrides.mode()));
        info!("StationService started in {:?}", self.overrides.mode());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle:
    ///
    /// 1. maintain the network and dashboard link
    /// 2. service the dashboard and apply queued commands
    /// 3. read the sensors and publish the reading
    /// 4. in automatic mode, apply the threshold policy
    /// 5. if online, post the telemetry report
    ///
    /// Nothing in here can stop the loop: every failure degrades the
    /// current cycle only.
    pub fn cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        net: &mut impl ConnectivityPort,
        dashboard: &mut impl DashboardPort,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Link maintenance
        self.maintain_link(net, dashboard, sink);

        // 2. Remote commands
        if self.connection.dashboard_linked {
            if let Err(e) = dashboard.service(&self.mailbox) {
                self.dashboard_failed(e, dashboard, sink);
            }
        }
        self.apply_pending(hw, dashboard, sink);

        // 3. Sensors
        let reading = hw.read();
        sink.emit(&AppEvent::Reading(reading));
        if let Err(e) = reading.distance_cm {
            warn!("Distance unavailable: {}", e);
            sink.emit(&AppEvent::SensorFault(e));
        }
        if let Err(e) = reading.temperature_c {
            debug!("Temperature unavailable: {}", e);
            sink.emit(&AppEvent::SensorFault(e));
        }
        if self.connection.dashboard_linked {
            self.publish_reading(&reading, dashboard, sink);
        }

        // 4. Automatic policy
        if !self.overrides.is_manual() {
            self.apply_policy(&reading, hw, dashboard, sink);
        }

        // 5. Telemetry
        if self.connection.network_up {
            let report = TelemetryReport::from_reading(&reading);
            self.send_report(&report, telemetry, sink);
        }

        self.last_reading = Some(reading);
    }

    /// Queue a command as if it had arrived from the dashboard.
    pub fn post_command(&self, cmd: RemoteCommand) -> bool {
        self.mailbox.post(cmd)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> ControlMode {
        self.overrides.mode()
    }

    pub fn overrides(&self) -> &OverrideState {
        &self.overrides
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Reading taken by the most recent cycle.
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    /// Total cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn maintain_link(
        &mut self,
        net: &mut impl ConnectivityPort,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        net.poll();
        let network_up = net.is_connected();

        if !network_up && dashboard.is_linked() {
            dashboard.unlink();
        }
        if network_up && !dashboard.is_linked() {
            // A fresh link replays the inbound channels into the mailbox.
            if let Err(e) = dashboard.link(&self.mailbox) {
                warn!("Dashboard link failed: {}", e);
                sink.emit(&AppEvent::LinkFailed(e));
            }
        }

        let next = ConnectionState {
            network_up,
            dashboard_linked: dashboard.is_linked(),
        };
        if next != self.connection {
            info!(
                "Link changed: network={} dashboard={}",
                next.network_up, next.dashboard_linked
            );
            sink.emit(&AppEvent::LinkChanged {
                network_up: next.network_up,
                dashboard_linked: next.dashboard_linked,
            });
        }
        self.connection = next;
    }

    fn apply_pending(
        &mut self,
        hw: &mut impl ActuatorPort,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        for cmd in self.mailbox.take() {
            self.apply_command(cmd, hw, dashboard, sink);
        }
    }

    fn apply_command(
        &mut self,
        cmd: RemoteCommand,
        hw: &mut impl ActuatorPort,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            RemoteCommand::SetOverride(enabled) => {
                let from = self.overrides.mode();
                if let Some(to) = self.overrides.set_enabled(enabled) {
                    info!("Manual override {}", if enabled { "on" } else { "off" });
                    sink.emit(&AppEvent::ModeChanged { from, to });
                }
            }
            RemoteCommand::SetRelay { energized } => match self.overrides.command_relay(energized) {
                Some(on) => self.drive_relay(on, RelaySource::Manual, hw, dashboard, sink),
                None => debug!("Relay command ignored in automatic mode"),
            },
        }
    }

    fn apply_policy(
        &mut self,
        reading: &Reading,
        hw: &mut impl ActuatorPort,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        match reading.distance() {
            Some(d) => {
                let energized = relay_for_distance(d, self.config.close_threshold_cm);
                self.drive_relay(energized, RelaySource::Auto, hw, dashboard, sink);
            }
            None => {
                let held = hw.relay_energized();
                self.drive_relay(held, RelaySource::Hold, hw, dashboard, sink);
            }
        }
    }

    fn drive_relay(
        &mut self,
        energized: bool,
        source: RelaySource,
        hw: &mut impl ActuatorPort,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        hw.set_relay(energized);
        info!("{}", if energized { "Relay closed" } else { "Relay opened" });
        sink.emit(&AppEvent::RelayDriven { energized, source });

        if self.connection.dashboard_linked {
            let status = relay_status_value(energized) as f32;
            if let Err(e) = dashboard.write(VirtualPin::Relay, status) {
                self.dashboard_failed(e, dashboard, sink);
            }
        }
    }

    fn publish_reading(
        &mut self,
        reading: &Reading,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        // Echo faults go out as sentinels; a missing probe is left unwritten.
        let values = [
            (VirtualPin::Distance, Some(reading.distance_or_sentinel())),
            (VirtualPin::Level, Some(reading.level_or_sentinel())),
            (VirtualPin::Temperature, reading.temperature()),
        ];
        for (pin, value) in values {
            let Some(v) = value else { continue };
            if let Err(e) = dashboard.write(pin, v) {
                self.dashboard_failed(e, dashboard, sink);
                return;
            }
        }
    }

    fn send_report(
        &mut self,
        report: &TelemetryReport,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) {
        let attempts = 1 + u32::from(self.config.report_retries);
        let mut last_err = CommsError::RequestFailed;
        for attempt in 1..=attempts {
            match telemetry.post(report) {
                Ok(()) => {
                    debug!("Telemetry posted (attempt {})", attempt);
                    return;
                }
                Err(e) => {
                    warn!("Telemetry post failed (attempt {}/{}): {}", attempt, attempts, e);
                    last_err = e;
                }
            }
        }
        sink.emit(&AppEvent::ReportFailed(last_err));
    }

    /// Drop the dashboard session; the next cycle relinks and resyncs.
    fn dashboard_failed(
        &mut self,
        err: CommsError,
        dashboard: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        warn!("Dashboard exchange failed: {}", err);
        dashboard.unlink();
        self.connection.dashboard_linked = false;
        sink.emit(&AppEvent::ReportFailed(err));
    }
}
