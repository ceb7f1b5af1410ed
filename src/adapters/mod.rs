//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `hardware`  | SensorPort         | HC-SR04 echo, DS18B20 probe  |
//! |             | ActuatorPort       | Relay GPIO                   |
//! | `wifi`      | ConnectivityPort   | ESP-IDF WiFi STA             |
//! | `dashboard` | DashboardPort      | Cloud dashboard HTTP API     |
//! | `telemetry` | TelemetryPort      | JSON-over-HTTP endpoint      |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `http`      | (shared client)    | ESP-IDF HTTP client          |
//! | `time`      | (uptime)           | ESP32 system timer           |

pub mod dashboard;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod telemetry;
pub mod time;
pub mod wifi;
