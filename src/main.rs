//! LevelStation Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   WifiAdapter     CloudDashboard  LogEventSink│
//! │  (Sensor+Actuator) (Connectivity)  (Dashboard)     (EventSink) │
//! │                    HttpTelemetry                               │
//! │                    (Telemetry)                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            StationService (pure logic)                 │    │
//! │  │  Override · Threshold policy · Dashboard sync          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{IOPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use levelstation::adapters::dashboard::CloudDashboard;
use levelstation::adapters::hardware::HardwareAdapter;
use levelstation::adapters::http::HttpClient;
use levelstation::adapters::log_sink::LogEventSink;
use levelstation::adapters::telemetry::HttpTelemetry;
use levelstation::adapters::time::Esp32TimeAdapter;
use levelstation::adapters::wifi::WifiAdapter;
use levelstation::app::service::StationService;
use levelstation::config::StationConfig;
use levelstation::drivers::hw_init::{self, GpioOutput};
use levelstation::drivers::relay::RelayDriver;
use levelstation::pins;
use levelstation::sensors::SensorHub;
use levelstation::sensors::distance::DistanceSensor;
use levelstation::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LevelStation v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (build-time defaults) ────────────────
    let config = StationConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    // ── 3. Peripherals; the relay comes up energized ──────────
    hw_init::init_peripherals()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = match EspDefaultNvsPartition::take() {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("NVS partition unavailable ({}), WiFi runs without it", e);
            None
        }
    };

    // ── 4. Construct adapters ─────────────────────────────────
    let probe_pin = PinDriver::input_output_od(peripherals.pins.gpio14.downgrade())?;
    let sensor_hub = SensorHub::new(
        DistanceSensor::new(pins::TRIG_GPIO, pins::ECHO_GPIO, config.echo_timeout_us),
        TemperatureSensor::new(pins::ONE_WIRE_GPIO, probe_pin),
        config.band(),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, RelayDriver::new(GpioOutput::new(pins::RELAY_GPIO)));

    let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs, &config)?;
    let mut dashboard = CloudDashboard::new(
        HttpClient::new(config.http_timeout_ms),
        &config.dashboard_url,
        &config.dashboard_token,
    );
    let mut telemetry = HttpTelemetry::new(
        HttpClient::new(config.http_timeout_ms),
        config.telemetry_url.clone(),
    );
    let mut log_sink = LogEventSink::new();

    // ── 5. Control service ────────────────────────────────────
    let phase_ms = config.phase_ms();
    let cycle_ms = config.cycle_interval_ms;
    let mut station = StationService::new(config);
    station.start(&mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    // Half a period before the work, whatever is left of the slot after it.
    let clock = Esp32TimeAdapter::new();
    loop {
        let started = clock.uptime_ms();
        hw_init::delay_ms(phase_ms);
        station.cycle(&mut hw, &mut wifi, &mut dashboard, &mut telemetry, &mut log_sink);
        hw_init::delay_ms(clock.remaining_ms(started, cycle_ms));
    }
}
