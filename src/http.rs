//! HTTP transport to the remote GPIO controller
//!
//! [`HttpTransport`] sends each query as a blocking GET with a bounded
//! timeout. A 200 response is success; any other status, an unusable URL, a
//! malformed response or a connection problem is an [`HttpError`], logged
//! with the controller host.
//!
//! ## Example
//!
//! ```rust,no_run
//! use megad_oled::{Builder, BusEndpoint, Display, HttpTransport};
//!
//! let endpoint = match BusEndpoint::new("192.168.0.14", "sec", "30", "31") {
//!     Ok(endpoint) => endpoint,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().endpoint(endpoint).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let transport = HttpTransport::from_config(&config);
//! let mut display = Display::new(transport, config);
//! if let Err(e) = display.prepare_display() {
//!     log::warn!("display update incomplete: {e}");
//! }
//! ```

use std::string::{String, ToString};
use std::time::Duration;

use log::{debug, error};

use crate::config::{BusEndpoint, Config, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::transport::{Transport, request_url};

/// User agent sent with every request; some controller firmware expects a
/// browser-like value
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Errors that can occur when sending a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HttpError {
    /// The request URL could not be built from the endpoint
    MalformedUrl(String),
    /// The controller answered with something that is not valid HTTP
    Protocol(String),
    /// DNS, connect, read or timeout failure
    Connection(String),
    /// The controller answered with a status other than 200
    Status(u16),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedUrl(e) => write!(f, "Malformed URL: {e}"),
            Self::Protocol(e) => write!(f, "Protocol error: {e}"),
            Self::Connection(e) => write!(f, "Connection error: {e}"),
            Self::Status(code) => write!(f, "Unexpected status {code}"),
        }
    }
}

impl core::error::Error for HttpError {}

impl From<ureq::Error> for HttpError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(transport) => {
                let text = transport.to_string();
                match transport.kind() {
                    ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
                        Self::MalformedUrl(text)
                    }
                    ureq::ErrorKind::BadStatus
                    | ureq::ErrorKind::BadHeader
                    | ureq::ErrorKind::TooManyRedirects
                    | ureq::ErrorKind::HTTP => Self::Protocol(text),
                    _ => Self::Connection(text),
                }
            }
        }
    }
}

/// Blocking HTTP transport to one controller
pub struct HttpTransport {
    /// Controller host, optionally with `:port`
    host: String,
    /// Path credential
    credential: String,
    /// Per-request timeout in milliseconds (0 = none)
    timeout_ms: u32,
    /// Client configured with the timeout
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport for the controller named by `endpoint`
    ///
    /// Uses [`DEFAULT_REQUEST_TIMEOUT_MS`].
    pub fn new(endpoint: &BusEndpoint) -> Self {
        Self {
            host: endpoint.host().to_string(),
            credential: endpoint.credential().to_string(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            agent: build_agent(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Create a transport from a display configuration
    pub fn from_config(config: &Config) -> Self {
        let mut transport = Self::new(&config.endpoint);
        transport.set_timeout(config.request_timeout_ms);
        transport
    }

    /// Set the per-request timeout in milliseconds
    ///
    /// Default is 1,000ms. Set to 0 to disable the timeout.
    pub fn set_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.timeout_ms = timeout_ms;
        self.agent = build_agent(timeout_ms);
        self
    }

    /// Get the current per-request timeout in milliseconds
    pub fn timeout(&self) -> u32 {
        self.timeout_ms
    }

    /// Controller host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL a query is sent to
    pub fn url(&self, query: &str) -> String {
        request_url(&self.host, &self.credential, query)
    }
}

impl core::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Credential left out on purpose, it ends up in logs
        f.debug_struct("HttpTransport")
            .field("host", &self.host)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn build_agent(timeout_ms: u32) -> ureq::Agent {
    let builder = ureq::AgentBuilder::new();
    let builder = if timeout_ms > 0 {
        builder.timeout(Duration::from_millis(u64::from(timeout_ms)))
    } else {
        builder
    };
    builder.build()
}

impl Transport for HttpTransport {
    type Error = HttpError;

    fn send(&mut self, query: &str) -> Result<(), Self::Error> {
        let url = self.url(query);
        let result = match self.agent.get(&url).set("User-Agent", USER_AGENT).call() {
            Ok(response) if response.status() == 200 => Ok(()),
            Ok(response) => Err(HttpError::Status(response.status())),
            Err(e) => Err(HttpError::from(e)),
        };

        match &result {
            Ok(()) => debug!("{}: OK", self.host),
            Err(e) => error!("Request to controller {} failed: {}", self.host, e),
        }
        result
    }
}
