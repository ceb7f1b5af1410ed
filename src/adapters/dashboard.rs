//! Cloud dashboard adapter over the dashboard's HTTP device API.
//!
//! Implements [`DashboardPort`].  The device polls the inbound channels
//! (override flag V4, relay command V0) and posts a command to the mailbox
//! whenever a value changes.  Outbound channels are written with one
//! `update` request each.
//!
//! ```text
//!   GET {url}/external/api/get?token=…&V4&V0     → {"V4":1,"V0":"0"}
//!   GET {url}/external/api/update?token=…&V1=42  → 200
//! ```
//!
//! Linking fetches the inbound values and replays them into the mailbox in
//! [`VirtualPin::INBOUND`] order, so the override flag always lands before
//! the relay command it gates.  An empty token disables the dashboard: the
//! adapter then never links and never touches the network.

use log::{debug, info, warn};
use serde_json::Value;

use crate::app::commands::{RemoteCommand, VirtualPin};
use crate::app::mailbox::CommandMailbox;
use crate::app::ports::DashboardPort;
use crate::config::is_url_safe_token;
use crate::error::CommsError;

use super::http::HttpClient;

const INBOUND_LEN: usize = VirtualPin::INBOUND.len();

pub struct CloudDashboard {
    http: HttpClient,
    base_url: String,
    token: String,
    linked: bool,
    /// Last value seen on each inbound channel, in `INBOUND` order.
    last_seen: [Option<i64>; INBOUND_LEN],
}

impl CloudDashboard {
    pub fn new(http: HttpClient, base_url: &str, token: &str) -> Self {
        let token = if token.is_empty() {
            info!("Dashboard: no token configured, dashboard disabled");
            ""
        } else if !is_url_safe_token(token) {
            warn!("Dashboard: token is not URL-safe, dashboard disabled");
            ""
        } else {
            token
        };
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            linked: false,
            last_seen: [None; INBOUND_LEN],
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.token.is_empty()
    }

    /// Last value seen on an inbound channel.
    pub fn last_seen(&self, pin: VirtualPin) -> Option<i64> {
        inbound_index(pin).and_then(|i| self.last_seen[i])
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.http
    }

    fn fetch_inbound(&mut self) -> Result<[Option<i64>; INBOUND_LEN], CommsError> {
        let url = get_url(&self.base_url, &self.token);
        let response = self.http.get(&url)?;
        if !response.is_ok() {
            return Err(CommsError::DashboardRejected(response.status));
        }
        parse_inbound(&response.body)
    }
}

impl DashboardPort for CloudDashboard {
    fn is_linked(&self) -> bool {
        self.linked
    }

    fn link(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let fetched = self.fetch_inbound()?;
        // Keep the previous value for channels the server left out.
        for (slot, value) in self.last_seen.iter_mut().zip(fetched) {
            if value.is_some() {
                *slot = value;
            }
        }
        for (pin, value) in VirtualPin::INBOUND.iter().zip(self.last_seen) {
            if let Some(cmd) = value.and_then(|v| RemoteCommand::from_pin_value(*pin, v)) {
                mailbox.post(cmd);
            }
        }
        self.linked = true;
        info!("Dashboard: linked, inbound channels replayed");
        Ok(())
    }

    fn unlink(&mut self) {
        if self.linked {
            info!("Dashboard: unlinked");
        }
        self.linked = false;
    }

    fn service(&mut self, mailbox: &CommandMailbox) -> Result<(), CommsError> {
        if !self.linked {
            return Err(CommsError::NotConnected);
        }
        let fetched = self.fetch_inbound()?;
        for (i, value) in fetched.into_iter().enumerate() {
            let Some(v) = value else { continue };
            if self.last_seen[i] == Some(v) {
                continue;
            }
            self.last_seen[i] = Some(v);
            let pin = VirtualPin::INBOUND[i];
            debug!("Dashboard: {} = {}", pin.label(), v);
            if let Some(cmd) = RemoteCommand::from_pin_value(pin, v) {
                mailbox.post(cmd);
            }
        }
        Ok(())
    }

    fn write(&mut self, pin: VirtualPin, value: f32) -> Result<(), CommsError> {
        if !self.linked {
            return Err(CommsError::NotConnected);
        }
        let url = update_url(&self.base_url, &self.token, pin, value);
        let response = self.http.get(&url)?;
        if !response.is_ok() {
            return Err(CommsError::DashboardRejected(response.status));
        }
        // Our own status write must not come back as a command.
        if let Some(i) = inbound_index(pin) {
            self.last_seen[i] = Some(value as i64);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Wire helpers
// ───────────────────────────────────────────────────────────────

fn inbound_index(pin: VirtualPin) -> Option<usize> {
    VirtualPin::INBOUND.iter().position(|p| *p == pin)
}

pub fn get_url(base: &str, token: &str) -> String {
    let mut url = format!("{}/external/api/get?token={}", base, token);
    for pin in VirtualPin::INBOUND {
        url.push('&');
        url.push_str(pin.label());
    }
    url
}

pub fn update_url(base: &str, token: &str, pin: VirtualPin, value: f32) -> String {
    format!(
        "{}/external/api/update?token={}&{}={}",
        base,
        token,
        pin.label(),
        format_value(value)
    )
}

/// Whole numbers go out without decimals, everything else with two.
pub fn format_value(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Decode the `get` response body.  Values may arrive as numbers, numeric
/// strings or single-element arrays; channels absent from the body are
/// `None`.
pub fn parse_inbound(body: &str) -> Result<[Option<i64>; INBOUND_LEN], CommsError> {
    let root: Value = serde_json::from_str(body).map_err(|_| CommsError::MalformedResponse)?;
    let obj = root.as_object().ok_or(CommsError::MalformedResponse)?;
    let mut out = [None; INBOUND_LEN];
    for (slot, pin) in out.iter_mut().zip(VirtualPin::INBOUND) {
        if let Some(v) = obj.get(pin.label()) {
            *slot = Some(value_as_int(v).ok_or(CommsError::MalformedResponse)?);
        }
    }
    Ok(out)
}

fn value_as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        Value::Array(items) => items.first().and_then(value_as_int),
        _ => None,
    }
}
