//! Remote GPIO transport abstraction
//!
//! This module provides the [`Transport`] trait, the [`Request`] wire encoding
//! and [`RecordingTransport`], an in-memory sink for tests.
//!
//! ## Wire Protocol
//!
//! The controller exposes its GPIO lines through plain HTTP GET requests to
//! `http://{host}/{credential}/?{query}`. Two query shapes are used:
//!
//! - Line set: `cmd={line}:{0|1};{line}:{0|1}...`, applied in the listed order
//! - Byte pulse: `pt={sda}&i2c={decimal}&scl={scl}:1;{scl}:0;`, the controller
//!   shifts the byte out on SDA and clocks it with one SCL pulse
//!
//! No body is sent and no response payload is parsed; a 200 status is the only
//! success signal.
//!
//! ## Example
//!
//! ```
//! use megad_oled::transport::{Line, LineState, Request};
//!
//! const STEPS: &[(Line, LineState)] = &[(Line::Data, LineState::Low), (Line::Clock, LineState::Low)];
//!
//! assert_eq!(Request::SetLines(STEPS).encode("30", "31"), "cmd=30:0;31:0");
//! assert_eq!(Request::PulseByte(0xAF).encode("30", "31"), "pt=30&i2c=175&scl=31:1;31:0;");
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Debug, Write};

type TransportResult<E> = core::result::Result<(), E>;

/// Trait for delivering encoded requests to the remote controller
///
/// This trait abstracts over the network client, allowing the
/// [`SoftI2c`](crate::bus::SoftI2c) bus to work with HTTP, a test sink, or any
/// other channel that reaches the controller.
///
/// ## Implementing
///
/// An implementation must issue exactly one request per call, must not retry,
/// and must treat anything except a 200 response as an error. For the network
/// case use [`HttpTransport`](crate::http::HttpTransport) (requires `http`
/// feature).
pub trait Transport {
    /// Error type for a failed request
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one request carrying `query` to the controller
    ///
    /// # Arguments
    ///
    /// * `query` - Encoded query string, without the leading `?`
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered or the
    /// controller did not answer with status 200.
    fn send(&mut self, query: &str) -> TransportResult<Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send(&mut self, query: &str) -> TransportResult<Self::Error> {
        (**self).send(query)
    }
}

/// Level of a GPIO line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    /// Driven low, encoded as `0`
    Low,
    /// Released high, encoded as `1`
    High,
}

impl LineState {
    /// Digit used for this state on the wire
    pub fn digit(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

impl From<embedded_hal::digital::PinState> for LineState {
    fn from(state: embedded_hal::digital::PinState) -> Self {
        match state {
            embedded_hal::digital::PinState::Low => Self::Low,
            embedded_hal::digital::PinState::High => Self::High,
        }
    }
}

/// Role of a bus line; resolved to an identifier when encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// SDA
    Data,
    /// SCL
    Clock,
}

/// A single request to the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    /// Drive lines to the given states, in order
    SetLines(&'static [(Line, LineState)]),
    /// Shift a byte out on SDA with one SCL pulse
    PulseByte(u8),
}

impl Request {
    /// Encode the request as a query string
    ///
    /// # Arguments
    ///
    /// * `data_line` - Identifier of the SDA line
    /// * `clock_line` - Identifier of the SCL line
    pub fn encode(&self, data_line: &str, clock_line: &str) -> String {
        match self {
            Self::SetLines(steps) => {
                let mut query = String::from("cmd=");
                for (i, (line, state)) in steps.iter().enumerate() {
                    if i > 0 {
                        query.push(';');
                    }
                    let name = match line {
                        Line::Data => data_line,
                        Line::Clock => clock_line,
                    };
                    // Writing into a String cannot fail
                    let _ = write!(query, "{}:{}", name, state.digit());
                }
                query
            }
            Self::PulseByte(value) => {
                format!("pt={data_line}&i2c={value}&scl={clock_line}:1;{clock_line}:0;")
            }
        }
    }
}

/// Full URL of a request to the controller
pub fn request_url(host: &str, credential: &str, query: &str) -> String {
    format!("http://{host}/{credential}/?{query}")
}

/// Error returned by [`RecordingTransport`] for requests it was told to reject
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejected {
    /// Index of the rejected request
    pub index: usize,
}

impl core::fmt::Display for Rejected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "request #{} rejected", self.index)
    }
}

impl core::error::Error for Rejected {}

/// In-memory transport that records every query it is given
///
/// Requests at the indices passed to [`fail_at`](Self::fail_at) are recorded
/// and then reported as failed, which makes best-effort behaviour observable.
///
/// ```
/// use megad_oled::{RecordingTransport, Transport};
///
/// let mut sink = RecordingTransport::new().fail_at(&[1]);
/// assert!(sink.send("cmd=30:0").is_ok());
/// assert!(sink.send("cmd=30:1").is_err());
/// assert_eq!(sink.requests().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    requests: Vec<String>,
    fail_at: Vec<usize>,
    sent: usize,
}

impl RecordingTransport {
    /// Create an empty sink that accepts every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the requests with these zero-based indices
    pub fn fail_at(mut self, indices: &[usize]) -> Self {
        self.fail_at.extend_from_slice(indices);
        self
    }

    /// Queries received so far, in order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Remove and return the recorded queries
    ///
    /// Request indices keep counting from where they were.
    pub fn take_requests(&mut self) -> Vec<String> {
        core::mem::take(&mut self.requests)
    }
}

impl Transport for RecordingTransport {
    type Error = Rejected;

    fn send(&mut self, query: &str) -> TransportResult<Self::Error> {
        let index = self.sent;
        self.sent += 1;
        self.requests.push(String::from(query));
        if self.fail_at.contains(&index) {
            return Err(Rejected { index });
        }
        Ok(())
    }
}
