//! I2C bus emulated through remote GPIO requests
//!
//! [`SoftI2c`] turns the I2C primitives needed to talk to a write-only device
//! into requests for a [`Transport`]. Each primitive is exactly one request:
//!
//! | Primitive | Line sequence |
//! |-----------|---------------|
//! | [`init`](SoftI2c::init) | SCL high, SDA high (idle) |
//! | [`start`](SoftI2c::start) | SDA low, SCL low |
//! | [`stop`](SoftI2c::stop) | SDA low, SCL high, SDA high |
//! | [`write_byte`](SoftI2c::write_byte) | byte pulse, shifted out by the controller |
//!
//! There is no acknowledge phase. A failed request does not stop the
//! sequence; it is logged and recorded, and the caller inspects the record
//! with [`failures`](SoftI2c::failures) or [`take_failures`](SoftI2c::take_failures).
//!
//! ## Example
//!
//! ```
//! use megad_oled::{BusEndpoint, RecordingTransport, SoftI2c};
//!
//! let endpoint = match BusEndpoint::new("192.168.0.14", "sec", "30", "31") {
//!     Ok(endpoint) => endpoint,
//!     Err(_) => return,
//! };
//! let mut bus = SoftI2c::new(RecordingTransport::new(), &endpoint);
//! bus.start();
//! bus.stop();
//!
//! assert_eq!(bus.transport().requests(), ["cmd=30:0;31:0", "cmd=30:0;31:1;30:1"]);
//! assert!(bus.failures().is_empty());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use log::{trace, warn};

use crate::config::BusEndpoint;
use crate::error::{Error, PrimitiveFailure};
use crate::transport::{Line, LineState, Request, Transport};

const IDLE: &[(Line, LineState)] = &[(Line::Clock, LineState::High), (Line::Data, LineState::High)];

// SDA falls while SCL is high, then SCL is pulled low for the first bit
const START: &[(Line, LineState)] = &[(Line::Data, LineState::Low), (Line::Clock, LineState::Low)];

// SDA rises while SCL is high
const STOP: &[(Line, LineState)] = &[
    (Line::Data, LineState::Low),
    (Line::Clock, LineState::High),
    (Line::Data, LineState::High),
];

/// Bus primitive, as recorded in failure reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Idle the bus
    Init,
    /// START condition
    Start,
    /// STOP condition
    Stop,
    /// Byte transfer
    WriteByte(u8),
}

/// Errors reported through the [`embedded_hal::i2c::I2c`] implementation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusError {
    /// The remote bus is write-only
    ReadUnsupported,
    /// Requests failed during the transaction
    Transport {
        /// Number of failed requests
        failed: usize,
    },
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReadUnsupported => write!(f, "Reads are not supported on the remote bus"),
            Self::Transport { failed } => write!(f, "{failed} request(s) failed"),
        }
    }
}

impl core::error::Error for BusError {}

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ReadUnsupported => ErrorKind::Other,
            Self::Transport { .. } => ErrorKind::Bus,
        }
    }
}

/// Write-only I2C bus driven through a remote GPIO controller
///
/// ## Type Parameters
///
/// * `T` - Transport implementing [`Transport`]
#[derive(Debug)]
pub struct SoftI2c<T: Transport> {
    /// Request channel to the controller
    transport: T,
    /// Identifier of the SDA line
    data_line: String,
    /// Identifier of the SCL line
    clock_line: String,
    /// Number of requests issued so far
    issued: usize,
    /// Primitives whose request failed, oldest first
    failures: Vec<PrimitiveFailure<T::Error>>,
}

impl<T: Transport> SoftI2c<T> {
    /// Create a bus on the lines named by `endpoint`
    pub fn new(transport: T, endpoint: &BusEndpoint) -> Self {
        Self {
            transport,
            data_line: endpoint.data_line().to_string(),
            clock_line: endpoint.clock_line().to_string(),
            issued: 0,
            failures: Vec::new(),
        }
    }

    /// Release both lines high, the idle state expected before [`start`](Self::start)
    pub fn init(&mut self) {
        self.dispatch(Primitive::Init, Request::SetLines(IDLE));
    }

    /// Issue a START condition
    pub fn start(&mut self) {
        self.dispatch(Primitive::Start, Request::SetLines(START));
    }

    /// Issue a STOP condition
    pub fn stop(&mut self) {
        self.dispatch(Primitive::Stop, Request::SetLines(STOP));
    }

    /// Transfer one byte
    pub fn write_byte(&mut self, value: u8) {
        self.dispatch(Primitive::WriteByte(value), Request::PulseByte(value));
    }

    /// Transfer one byte given as hexadecimal text, e.g. `"AF"`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidByte` without issuing a request if `hex` is not
    /// made of hex digits only or its value does not fit in a byte.
    pub fn write_hex(&mut self, hex: &str) -> Result<(), Error<T>> {
        let value = parse_hex_byte(hex).ok_or_else(|| Error::InvalidByte {
            input: hex.to_string(),
        })?;
        self.write_byte(value);
        Ok(())
    }

    /// Number of requests issued so far
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Primitives whose request failed, oldest first
    pub fn failures(&self) -> &[PrimitiveFailure<T::Error>] {
        &self.failures
    }

    /// Remove and return the recorded failures
    pub fn take_failures(&mut self) -> Vec<PrimitiveFailure<T::Error>> {
        core::mem::take(&mut self.failures)
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the bus and return the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn dispatch(&mut self, primitive: Primitive, request: Request) {
        let query = request.encode(&self.data_line, &self.clock_line);
        let index = self.issued;
        self.issued += 1;
        trace!("#{index} {primitive:?}: {query}");

        if let Err(error) = self.transport.send(&query) {
            warn!("{primitive:?} failed (request #{index}): {error:?}");
            self.failures.push(PrimitiveFailure {
                index,
                primitive,
                error,
            });
        }
    }
}

fn parse_hex_byte(hex: &str) -> Option<u8> {
    // from_str_radix alone would accept a leading '+'
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

impl<T: Transport> ErrorType for SoftI2c<T> {
    type Error = BusError;
}

impl<T: Transport> I2c for SoftI2c<T> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations
            .iter()
            .any(|operation| matches!(operation, Operation::Read(_)))
        {
            return Err(BusError::ReadUnsupported);
        }

        let before = self.failures.len();
        self.start();
        self.write_byte(address << 1);
        for operation in operations.iter() {
            if let Operation::Write(bytes) = operation {
                for &byte in bytes.iter() {
                    self.write_byte(byte);
                }
            }
        }
        self.stop();

        match self.failures.len() - before {
            0 => Ok(()),
            failed => Err(BusError::Transport { failed }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Rejected, RecordingTransport};

    fn test_bus(transport: RecordingTransport) -> SoftI2c<RecordingTransport> {
        let endpoint = BusEndpoint::new("10.0.0.2", "sec", "30", "31").unwrap();
        SoftI2c::new(transport, &endpoint)
    }

    #[test]
    fn test_start_then_stop_follow_canonical_patterns() {
        let mut bus = test_bus(RecordingTransport::new());
        bus.start();
        bus.stop();
        assert_eq!(
            bus.transport().requests(),
            ["cmd=30:0;31:0", "cmd=30:0;31:1;30:1"]
        );
    }

    #[test]
    fn test_init_idles_clock_then_data() {
        let mut bus = test_bus(RecordingTransport::new());
        bus.init();
        assert_eq!(bus.transport().requests(), ["cmd=31:1;30:1"]);
    }

    #[test]
    fn test_write_hex_encodes_decimal() {
        let mut bus = test_bus(RecordingTransport::new());
        bus.write_hex("FF").unwrap();
        bus.write_hex("00").unwrap();
        bus.write_hex("7f").unwrap();
        assert_eq!(
            bus.transport().requests(),
            [
                "pt=30&i2c=255&scl=31:1;31:0;",
                "pt=30&i2c=0&scl=31:1;31:0;",
                "pt=30&i2c=127&scl=31:1;31:0;",
            ]
        );
    }

    #[test]
    fn test_write_hex_rejects_malformed_input_before_sending() {
        let mut bus = test_bus(RecordingTransport::new());
        for input in ["", "G1", "+F", "1FF", "0x10", " 1"] {
            let result = bus.write_hex(input);
            assert!(
                matches!(result, Err(Error::InvalidByte { .. })),
                "accepted {input:?}"
            );
        }
        assert!(bus.transport().requests().is_empty());
        assert_eq!(bus.issued(), 0);
    }

    #[test]
    fn test_failures_are_recorded_and_sequence_continues() {
        let mut bus = test_bus(RecordingTransport::new().fail_at(&[1]));
        bus.start();
        bus.write_byte(0x78);
        bus.write_byte(0x00);
        bus.stop();

        assert_eq!(bus.issued(), 4);
        assert_eq!(bus.transport().requests().len(), 4);
        assert_eq!(
            bus.failures(),
            [PrimitiveFailure {
                index: 1,
                primitive: Primitive::WriteByte(0x78),
                error: Rejected { index: 1 },
            }]
        );

        let taken = bus.take_failures();
        assert_eq!(taken.len(), 1);
        assert!(bus.failures().is_empty());
    }

    #[test]
    fn test_i2c_write_frames_address_and_bytes() {
        let mut bus = test_bus(RecordingTransport::new());
        bus.write(0x3C, &[0x00, 0xAF]).unwrap();
        assert_eq!(
            bus.transport().requests(),
            [
                "cmd=30:0;31:0",
                "pt=30&i2c=120&scl=31:1;31:0;",
                "pt=30&i2c=0&scl=31:1;31:0;",
                "pt=30&i2c=175&scl=31:1;31:0;",
                "cmd=30:0;31:1;30:1",
            ]
        );
    }

    #[test]
    fn test_i2c_read_is_rejected_without_requests() {
        let mut bus = test_bus(RecordingTransport::new());
        let mut buffer = [0u8; 1];
        let result = bus.write_read(0x3C, &[0x00], &mut buffer);
        assert_eq!(result, Err(BusError::ReadUnsupported));
        assert!(bus.transport().requests().is_empty());
    }

    #[test]
    fn test_i2c_transaction_reports_failed_requests() {
        let mut bus = test_bus(RecordingTransport::new().fail_at(&[0, 2]));
        let result = bus.write(0x3C, &[0x00]);
        assert_eq!(result, Err(BusError::Transport { failed: 2 }));
        assert_eq!(bus.transport().requests().len(), 4);
    }
}
