//! HTTP telemetry adapter.
//!
//! Implements [`TelemetryPort`] by POSTing each report as JSON to the
//! configured endpoint.  Only `200` counts as accepted; any other status is
//! reported as [`CommsError::ReportRejected`] and the report is dropped by
//! the caller.

use log::info;

use crate::app::ports::{TelemetryPort, TelemetryReport};
use crate::error::CommsError;

use super::http::HttpClient;

pub struct HttpTelemetry {
    http: HttpClient,
    url: String,
    posted: u32,
}

impl HttpTelemetry {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            posted: 0,
        }
    }

    /// Reports accepted by the endpoint so far.
    pub fn posted(&self) -> u32 {
        self.posted
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.http
    }
}

/// Serialize a report to the wire body.
pub fn encode(report: &TelemetryReport) -> Result<Vec<u8>, CommsError> {
    serde_json::to_vec(report).map_err(|_| CommsError::MalformedResponse)
}

impl TelemetryPort for HttpTelemetry {
    fn post(&mut self, report: &TelemetryReport) -> Result<(), CommsError> {
        let body = encode(report)?;
        let response = self.http.post_json(&self.url, &body)?;
        if !response.is_ok() {
            return Err(CommsError::ReportRejected(response.status));
        }
        self.posted += 1;
        info!("REPORT | accepted ({})", response.status);
        Ok(())
    }
}
