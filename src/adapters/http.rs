//! Blocking HTTP client shared by the telemetry and dashboard adapters.
//!
//! Every request carries the configured timeout; a request that does not
//! complete in time fails with [`CommsError::Timeout`] and never stalls the
//! control loop past that bound.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` wrapped in the
//!   `embedded-svc` client, one connection per request.
//! - **all other targets**: a scripted stub that records every request and
//!   answers from a queue of canned responses (200 with an empty body when
//!   the queue is empty).

use core::time::Duration;

use log::debug;

use crate::error::CommsError;

/// Upper bound on a response body we are willing to buffer.
pub const MAX_BODY_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request as seen by the simulated transport.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub timeout: Duration,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub struct HttpClient {
    timeout: Duration,
    #[cfg(not(target_os = "espidf"))]
    sim_responses: std::collections::VecDeque<Result<HttpResponse, CommsError>>,
    #[cfg(not(target_os = "espidf"))]
    sim_requests: Vec<RecordedRequest>,
}

impl HttpClient {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout: Duration::from_millis(u64::from(timeout_ms)),
            #[cfg(not(target_os = "espidf"))]
            sim_responses: std::collections::VecDeque::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_requests: Vec::new(),
        }
    }

    pub fn get(&mut self, url: &str) -> Result<HttpResponse, CommsError> {
        debug!("HTTP GET {}", redact(url));
        self.platform_request(HttpMethod::Get, url, None)
    }

    pub fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, CommsError> {
        debug!("HTTP POST {} ({} bytes)", redact(url), body.len());
        self.platform_request(HttpMethod::Post, url, Some(body))
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse, CommsError> {
        use embedded_svc::http::client::Client;
        use embedded_svc::http::{Method, Status};
        use embedded_svc::io::{Read, Write};
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

        let conf = Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&conf).map_err(|_| CommsError::RequestFailed)?;
        let mut client = Client::wrap(conn);

        let mut response = match (method, body) {
            (HttpMethod::Post, Some(payload)) => {
                let len = payload.len().to_string();
                let headers = [
                    ("Content-Type", "application/json"),
                    ("Content-Length", len.as_str()),
                ];
                let mut request = client
                    .request(Method::Post, url, &headers)
                    .map_err(map_io_error)?;
                request.write_all(payload).map_err(map_io_error)?;
                request.flush().map_err(map_io_error)?;
                request.submit().map_err(map_io_error)?
            }
            _ => client
                .request(Method::Get, url, &[])
                .map_err(map_io_error)?
                .submit()
                .map_err(map_io_error)?,
        };

        let status = response.status();
        let mut buf = [0_u8; MAX_BODY_LEN];
        let mut filled = 0;
        while filled < buf.len() {
            let n = response.read(&mut buf[filled..]).map_err(map_io_error)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        let body = core::str::from_utf8(&buf[..filled])
            .map_err(|_| CommsError::MalformedResponse)?
            .to_string();
        Ok(HttpResponse { status, body })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse, CommsError> {
        self.sim_requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            timeout: self.timeout,
            content_type: body.map(|_| "application/json".to_string()),
            body: body.map(<[u8]>::to_vec).unwrap_or_default(),
        });
        self.sim_responses
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok("")))
    }

    // ── Simulation controls ───────────────────────────────────

    /// Queue the outcome of the next request.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_push_response(&mut self, response: Result<HttpResponse, CommsError>) {
        self.sim_responses.push_back(response);
    }

    /// Every request issued so far, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_requests(&self) -> &[RecordedRequest] {
        &self.sim_requests
    }
}

#[cfg(target_os = "espidf")]
fn map_io_error(e: esp_idf_svc::io::EspIOError) -> CommsError {
    use esp_idf_svc::sys::{ESP_ERR_HTTP_EAGAIN, ESP_ERR_TIMEOUT};

    let code = e.0.code();
    if code == ESP_ERR_TIMEOUT as i32 || code == ESP_ERR_HTTP_EAGAIN as i32 {
        CommsError::Timeout
    } else {
        CommsError::RequestFailed
    }
}

/// Strip the query string so tokens never reach the log.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
