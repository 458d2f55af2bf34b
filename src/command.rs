//! SSD1306 command definitions
//!
//! This module defines the command and control bytes used to drive an
//! SSD1306-class OLED controller over I2C. Every I2C write to the controller
//! starts with the device address byte followed by a control byte that
//! selects how the remaining bytes are interpreted.
//!
//! ## Transfer Structure
//!
//! 1. START condition
//! 2. Device address with write bit ([`DEVICE_ADDRESS_WRITE`])
//! 3. Control byte ([`CONTROL_COMMAND`] or [`CONTROL_DATA`])
//! 4. Command/operand bytes or pixel data bytes
//! 5. STOP condition
//!
//! ## Example
//!
//! ```
//! use megad_oled::{command, RecordingTransport, SoftI2c};
//! # use megad_oled::BusEndpoint;
//! # let endpoint = match BusEndpoint::new("192.168.0.14", "sec", "30", "31") {
//! #     Ok(endpoint) => endpoint,
//! #     Err(_) => return,
//! # };
//! let mut bus = SoftI2c::new(RecordingTransport::new(), &endpoint);
//!
//! // Turn the panel on
//! bus.start();
//! bus.write_byte(command::DEVICE_ADDRESS_WRITE);
//! bus.write_byte(command::CONTROL_COMMAND);
//! bus.write_byte(command::DISPLAY_ON);
//! bus.stop();
//! ```

// I2C framing

/// Default device address (0x3C) shifted left with the write bit clear (0x78)
pub const DEVICE_ADDRESS_WRITE: u8 = 0x78;

/// Control byte announcing a stream of command bytes (0x00)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a stream of GDDRAM data bytes (0x40)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Set contrast command (0x81)
///
/// Requires 1 operand byte: contrast level 0x00-0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Normal display, lit pixel = 1 (0xA6)
pub const SET_NORMAL: u8 = 0xA6;

/// Inverse display, lit pixel = 0 (0xA7)
pub const SET_INVERSE: u8 = 0xA7;

/// Display on (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing commands

/// Set memory addressing mode (0x20)
///
/// Requires 1 operand byte, see [`ADDRESSING_HORIZONTAL`] and
/// [`ADDRESSING_VERTICAL`].
pub const SET_ADDRESSING_MODE: u8 = 0x20;

/// Horizontal addressing: column pointer advances first, then page
pub const ADDRESSING_HORIZONTAL: u8 = 0x00;

/// Vertical addressing: page pointer advances first, then column
///
/// Bit 6 is ignored by the controller; this is the value the controller
/// firmware integration has always sent, so it is kept byte-for-byte.
pub const ADDRESSING_VERTICAL: u8 = 0x41;

/// Set column address window (0x21)
///
/// Requires 2 operand bytes: [start column, end column] (inclusive).
pub const SET_COLUMN_ADDRESS: u8 = 0x21;

/// Set page address window (0x22)
///
/// Requires 2 operand bytes: [start page, end page] (inclusive).
pub const SET_PAGE_ADDRESS: u8 = 0x22;

// Hardware configuration commands

/// Segment re-map, column 0 mapped to SEG0 (0xA0)
pub const SEGMENT_REMAP_NORMAL: u8 = 0xA0;

/// Segment re-map, column 127 mapped to SEG0 (0xA1)
pub const SEGMENT_REMAP_REVERSED: u8 = 0xA1;

/// COM output scan direction, COM0 to COM[N-1] (0xC0)
pub const COM_SCAN_INCREMENT: u8 = 0xC0;

/// COM output scan direction, COM[N-1] to COM0 (0xC8)
pub const COM_SCAN_DECREMENT: u8 = 0xC8;

// Timing and driving commands

/// Set display clock divide ratio / oscillator frequency (0xD5)
///
/// Requires 1 operand byte; 0x80 is the reset default.
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Charge pump setting (0x8D)
///
/// Requires 1 operand byte: 0x14 enables the pump, 0x10 disables it.
/// The panel stays dark without the pump on boards lacking an external VCC.
pub const SET_CHARGE_PUMP: u8 = 0x8D;

/// Charge pump operand enabling the internal DC-DC converter
pub const CHARGE_PUMP_ENABLE: u8 = 0x14;
