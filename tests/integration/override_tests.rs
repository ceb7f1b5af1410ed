//! Integration tests for the manual-override state machine as driven by
//! dashboard commands through the mailbox.

use super::mock_hw::{MockDashboard, MockHardware, MockNetwork, MockTelemetry, RecordingSink, reading};

use levelstation::app::commands::{RemoteCommand, VirtualPin};
use levelstation::app::events::{AppEvent, RelaySource};
use levelstation::app::service::StationService;
use levelstation::config::StationConfig;
use levelstation::control::override_state::ControlMode;

struct Rig {
    station: StationService,
    hw: MockHardware,
    net: MockNetwork,
    dashboard: MockDashboard,
    telemetry: MockTelemetry,
    sink: RecordingSink,
}

fn rig(distance_cm: f32) -> Rig {
    let mut station = StationService::new(StationConfig::default());
    let mut sink = RecordingSink::new();
    station.start(&mut sink);
    Rig {
        station,
        hw: MockHardware::new(distance_cm, 21.0),
        net: MockNetwork::up(),
        dashboard: MockDashboard::new(),
        telemetry: MockTelemetry::new(),
        sink,
    }
}

impl Rig {
    fn cycle(&mut self) {
        self.station.cycle(
            &mut self.hw,
            &mut self.net,
            &mut self.dashboard,
            &mut self.telemetry,
            &mut self.sink,
        );
    }
}

#[test]
fn manual_mode_ignores_every_distance() {
    let mut r = rig(50.0);
    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.hw.script([
        reading(Ok(50.0), Ok(21.0)),
        reading(Ok(2.0), Ok(21.0)),
        reading(Ok(99.0), Ok(21.0)),
        reading(Ok(3.0), Ok(21.0)),
    ]);
    for _ in 0..4 {
        r.cycle();
    }

    assert_eq!(r.station.mode(), ControlMode::Manual);
    assert!(r.hw.relay_writes.is_empty(), "no distance may drive the relay");
    assert_eq!(r.telemetry.reports.len(), 4, "reporting continues in manual");
}

#[test]
fn manual_relay_command_applies_immediately() {
    let mut r = rig(5.0);
    r.cycle();
    assert!(r.hw.relay());

    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.dashboard.set_remote(VirtualPin::Relay, 1);
    r.cycle();

    assert!(!r.hw.relay());
    assert_eq!(r.station.overrides().commanded_relay(), Some(false));
    assert!(r.sink.events.contains(&AppEvent::RelayDriven {
        energized: false,
        source: RelaySource::Manual,
    }));
    assert_eq!(r.dashboard.written(VirtualPin::Relay).last(), Some(&1.0));
}

#[test]
fn relay_command_in_auto_is_ignored() {
    let mut r = rig(5.0);
    r.cycle();
    r.dashboard.set_remote(VirtualPin::Relay, 1);
    r.cycle();

    assert!(r.hw.relay(), "threshold policy keeps control");
    assert!(r.hw.relay_writes.iter().all(|on| *on));
    assert_eq!(r.station.overrides().commanded_relay(), None);
}

#[test]
fn auto_manual_auto_restores_threshold_control() {
    let mut r = rig(5.0);
    r.cycle();
    assert!(r.hw.relay());

    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.cycle();
    r.hw.set_reading(reading(Ok(50.0), Ok(21.0)));
    r.cycle();
    assert!(r.hw.relay(), "manual mode holds the relay");

    r.dashboard.set_remote(VirtualPin::OverrideEnable, 0);
    r.cycle();
    assert_eq!(r.station.mode(), ControlMode::Auto);
    assert!(!r.hw.relay(), "first auto cycle applies the threshold");

    let modes: Vec<_> = r
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ModeChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(modes, vec![ControlMode::Manual, ControlMode::Auto]);
}

#[test]
fn leaving_manual_forgets_commanded_relay() {
    let mut r = rig(50.0);
    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.dashboard.set_remote(VirtualPin::Relay, 0);
    r.cycle();
    assert_eq!(r.station.overrides().commanded_relay(), Some(true));

    r.dashboard.set_remote(VirtualPin::OverrideEnable, 0);
    r.cycle();
    assert_eq!(r.station.overrides().commanded_relay(), None);
}

#[test]
fn relink_replays_override_then_relay() {
    let mut r = rig(50.0);
    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.dashboard.set_remote(VirtualPin::Relay, 0);
    r.cycle();
    assert!(r.hw.relay());

    // While offline the relay is flipped by hand; the dashboard still says 0.
    r.net.up = false;
    r.cycle();
    r.hw.set_relay_for_test(false);

    r.net.up = true;
    r.cycle();
    assert_eq!(r.station.mode(), ControlMode::Manual);
    assert!(r.hw.relay(), "replayed relay command re-applied after override");
    assert_eq!(r.dashboard.links, 2);
}

#[test]
fn manual_mode_survives_network_loss() {
    let mut r = rig(50.0);
    r.dashboard.set_remote(VirtualPin::OverrideEnable, 1);
    r.cycle();

    r.net.up = false;
    r.hw.set_reading(reading(Ok(1.0), Ok(21.0)));
    for _ in 0..3 {
        r.cycle();
    }
    assert_eq!(r.station.mode(), ControlMode::Manual);
    assert!(r.hw.relay_writes.is_empty());
}

#[test]
fn locally_posted_commands_are_applied_next_cycle() {
    let mut r = rig(50.0);
    r.net.up = false;
    assert!(r.station.post_command(RemoteCommand::SetOverride(true)));
    assert!(r.station.post_command(RemoteCommand::SetRelay { energized: false }));
    r.cycle();

    assert_eq!(r.station.mode(), ControlMode::Manual);
    assert_eq!(r.hw.relay_writes, vec![false]);
}
