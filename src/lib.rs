//! SSD1306 OLED Text Driver over Remote GPIO
//!
//! A driver for SSD1306 OLED panels wired to two GPIO lines of a network
//! controller. The controller exposes its lines over HTTP; this crate emulates
//! a write-only I2C bus on top of those requests and renders proportional text
//! into the panel's framebuffer.
//!
//! ## Features
//!
//! - `no_std` core, `alloc` required
//! - `embedded-hal` v1.0 [`I2c`](embedded_hal::i2c::I2c) implementation for the emulated bus
//! - Blocking HTTP transport with a bounded timeout (with `http` feature)
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Configurable panel geometry, orientation and contrast
//! - Transport failures are collected and reported, never silently dropped
//!
//! ## Usage
//!
//! ```rust
//! use megad_oled::{Builder, BusEndpoint, Display, DisplayState, RecordingTransport};
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
//! let mut display = Display::new(RecordingTransport::new(), config);
//! assert!(display.prepare_display().is_ok());
//! assert_eq!(display.state(), DisplayState::Positioned);
//! assert!(display.write_text("Test!", "default", 16, 2).is_ok());
//! ```
//!
//! Swap [`RecordingTransport`] for `HttpTransport` to drive real hardware.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Emulated I2C bus primitives
pub mod bus;
/// SSD1306 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Glyph tables
pub mod font;
/// Text layout
pub mod render;
/// Request channel abstraction
pub mod transport;

/// HTTP transport (requires `http` feature)
#[cfg(feature = "http")]
pub mod http;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use bus::{BusError, Primitive, SoftI2c};
pub use config::{
    Builder, BusEndpoint, Config, DEFAULT_REQUEST_TIMEOUT_MS, Dimensions, MAX_COLUMNS, MAX_PAGES,
    Rotation,
};
pub use display::{Display, DisplayState, PLACEHOLDER_TEXT};
pub use error::{BuilderError, Error, FontError, PrimitiveFailure};
pub use font::{DEFAULT_FONT, FontTable, Glyph};
pub use transport::{Line, LineState, RecordingTransport, Rejected, Request, Transport};

#[cfg(feature = "http")]
pub use http::{HttpError, HttpTransport};

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
