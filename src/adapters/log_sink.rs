//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per application
//! event to the ESP-IDF logger (UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reading(r) => {
                let distance = match r.distance() {
                    Some(d) => format!("{:.2}cm", d),
                    None => "--".into(),
                };
                let level = match r.level_pct {
                    Some(l) => format!("{:.0}%", l),
                    None => "--".into(),
                };
                let temperature = match r.temperature() {
                    Some(t) => format!("{:.2}\u{00b0}C", t),
                    None => "--".into(),
                };
                info!(
                    "READING | distance={} | level={} | T={}",
                    distance, level, temperature,
                );
            }
            AppEvent::RelayDriven { energized, source } => {
                info!(
                    "RELAY | {} | source={:?}",
                    if *energized { "closed" } else { "opened" },
                    source
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::ReportFailed(e) => {
                warn!("COMMS | {}", e);
            }
            AppEvent::LinkFailed(e) => {
                warn!("LINK | failed: {}", e);
            }
            AppEvent::LinkChanged {
                network_up,
                dashboard_linked,
            } => {
                info!(
                    "LINK | network={} | dashboard={}",
                    if *network_up { "up" } else { "down" },
                    if *dashboard_linked { "linked" } else { "unlinked" },
                );
            }
            AppEvent::Started(mode) => {
                info!("START | mode={:?}", mode);
            }
        }
    }
}
