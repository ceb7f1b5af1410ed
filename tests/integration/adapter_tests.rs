//! End-to-end cycles through the real adapters running on their host
//! simulations: simulated GPIO and sensors, simulated access point and
//! the scripted HTTP client.

use super::mock_hw::{MockHardware, RecordingSink};

use levelstation::adapters::dashboard::CloudDashboard;
use levelstation::adapters::hardware::HardwareAdapter;
use levelstation::adapters::http::{HttpClient, HttpMethod, HttpResponse};
use levelstation::adapters::telemetry::HttpTelemetry;
use levelstation::adapters::wifi::WifiAdapter;
use levelstation::app::events::AppEvent;
use levelstation::app::service::StationService;
use levelstation::config::StationConfig;
use levelstation::control::override_state::ControlMode;
use levelstation::drivers::hw_init::{self, GpioOutput};
use levelstation::drivers::relay::RelayDriver;
use levelstation::error::CommsError;
use levelstation::pins;
use levelstation::sensors::SensorHub;
use levelstation::sensors::distance::{self, DistanceSensor};
use levelstation::sensors::temperature::{self, TemperatureSensor};

fn config() -> StationConfig {
    StationConfig {
        dashboard_token: "tok".into(),
        telemetry_url: "http://collector:3000/api/information".into(),
        ..StationConfig::default()
    }
}

fn network(config: &StationConfig) -> (WifiAdapter, CloudDashboard, HttpTelemetry) {
    let mut wifi = WifiAdapter::new(config).unwrap();
    wifi.sim_set_ap(true);
    let dashboard = CloudDashboard::new(
        HttpClient::new(config.http_timeout_ms),
        &config.dashboard_url,
        &config.dashboard_token,
    );
    let telemetry = HttpTelemetry::new(
        HttpClient::new(config.http_timeout_ms),
        config.telemetry_url.clone(),
    );
    (wifi, dashboard, telemetry)
}

// The only test in this binary that touches the simulated GPIO and sensor
// statics.
#[test]
fn full_stack_cycle_reports_and_publishes() {
    let config = config();
    hw_init::init_peripherals().unwrap();
    let mut hw = HardwareAdapter::new(
        SensorHub::new(
            DistanceSensor::new(pins::TRIG_GPIO, pins::ECHO_GPIO, config.echo_timeout_us),
            TemperatureSensor::new(pins::ONE_WIRE_GPIO),
            config.band(),
        ),
        RelayDriver::new(GpioOutput::new(pins::RELAY_GPIO)),
    );
    distance::sim_set_echo_us(294);
    temperature::sim_set_temperature(22.3);

    let (mut wifi, mut dashboard, mut telemetry) = network(&config);
    let mut station = StationService::new(config);
    let mut sink = RecordingSink::new();
    station.start(&mut sink);

    // First cycle starts the association; nothing goes out yet.
    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);
    assert!(!station.connection().network_up);
    assert!(telemetry.http().sim_requests().is_empty());
    assert!(hw_init::gpio_read(pins::RELAY_GPIO));

    // Link fetch, then the regular poll.
    dashboard
        .http_mut()
        .sim_push_response(Ok(HttpResponse::ok(r#"{"V4":0,"V0":0}"#)));
    dashboard
        .http_mut()
        .sim_push_response(Ok(HttpResponse::ok(r#"{"V4":0,"V0":0}"#)));
    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);

    assert!(station.connection().dashboard_linked);
    let posts = telemetry.http().sim_requests();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].method, HttpMethod::Post);
    assert_eq!(posts[0].url, "http://collector:3000/api/information");
    assert_eq!(
        String::from_utf8(posts[0].body.clone()).unwrap(),
        r#"{"distance":4,"level":100,"temperature":"22.30"}"#
    );

    let urls: Vec<&str> = dashboard
        .http()
        .sim_requests()
        .iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(urls.len(), 6, "{:?}", urls);
    assert!(urls[0].ends_with("/external/api/get?token=tok&V4&V0"));
    assert!(urls[2].ends_with("&V1=5.00"));
    assert!(urls[3].ends_with("&V3=100"));
    assert!(urls[4].ends_with("&V2=22.30"));
    assert!(urls[5].ends_with("&V0=0"));
    assert!(hw_init::gpio_read(pins::RELAY_GPIO));
}

#[test]
fn dashboard_override_reaches_service() {
    let config = config();
    let (mut wifi, mut dashboard, mut telemetry) = network(&config);
    let mut hw = MockHardware::new(50.0, 20.0);
    let mut station = StationService::new(config);
    let mut sink = RecordingSink::new();

    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);

    // Link replays V4=1 then V0=0: manual, relay energized by command.
    dashboard
        .http_mut()
        .sim_push_response(Ok(HttpResponse::ok(r#"{"V4":"1","V0":"0"}"#)));
    dashboard
        .http_mut()
        .sim_push_response(Ok(HttpResponse::ok(r#"{"V4":"1","V0":"0"}"#)));
    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);

    assert_eq!(station.mode(), ControlMode::Manual);
    assert!(hw.relay());
    assert_eq!(hw.relay_writes.last(), Some(&true));
}

#[test]
fn rejected_dashboard_link_keeps_loop_running() {
    let config = config();
    let (mut wifi, mut dashboard, mut telemetry) = network(&config);
    let mut hw = MockHardware::new(5.0, 20.0);
    let mut station = StationService::new(config);
    let mut sink = RecordingSink::new();

    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);
    dashboard.http_mut().sim_push_response(Ok(HttpResponse {
        status: 401,
        body: "invalid token".into(),
    }));
    station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut sink);

    assert!(station.connection().network_up);
    assert!(!station.connection().dashboard_linked);
    assert!(hw.relay());
    assert_eq!(telemetry.posted(), 1);
    assert!(sink
        .events
        .contains(&AppEvent::LinkFailed(CommsError::DashboardRejected(401))));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReportFailed(_))), 0);
}
