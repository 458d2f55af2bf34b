//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! font selection ([`FontError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`FontError`] - Font preset lookup failures
//! - [`Error`] - Runtime errors during display operations
//! - [`PrimitiveFailure`] - One bus primitive whose request did not succeed
//!
//! Transport failures never interrupt a command sequence. They are collected
//! while the sequence runs and handed back as [`Error::Transport`] once it has
//! completed, so the caller decides whether a partially delivered update is a
//! fault.
//!
//! ## Example
//!
//! ```
//! use megad_oled::{BuilderError, Builder, BusEndpoint};
//!
//! // Missing endpoint
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingEndpoint)));
//!
//! // Line identifiers may not contain query separators
//! let result = BusEndpoint::new("10.0.0.2", "sec", "30;1", "31");
//! assert!(result.is_err());
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::bus::Primitive;
use crate::display::DisplayState;
use crate::transport::Transport;

/// A bus primitive whose request was not acknowledged by the controller
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveFailure<E> {
    /// Zero-based index of the request within the lifetime of the bus
    pub index: usize,
    /// The primitive that produced the request
    pub primitive: Primitive,
    /// The error reported by the transport
    pub error: E,
}

/// Errors that can occur when interacting with the display
///
/// Generic over the transport type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<T: Transport> {
    /// One or more requests failed while the sequence ran to completion
    ///
    /// Failures are listed in the order they happened.
    Transport(Vec<PrimitiveFailure<T::Error>>),
    /// A byte given as hexadecimal text could not be parsed
    ///
    /// Raised before any request is issued.
    InvalidByte {
        /// The rejected input
        input: String,
    },
    /// Operation called before the controller reached the required state
    InvalidState {
        /// Minimum state the operation needs
        required: DisplayState,
        /// State the driver was in
        actual: DisplayState,
    },
    /// Text cursor outside the panel
    ///
    /// `column` must be below the panel width and `page` below its page count.
    InvalidPosition {
        /// Requested column
        column: u8,
        /// Requested page
        page: u8,
    },
    /// Frame buffer length does not match the panel geometry
    BufferSize {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Requested font is not available
    Font(FontError),
}

impl<T: Transport> Error<T> {
    /// Failed primitives, if this is a transport error
    pub fn failures(&self) -> &[PrimitiveFailure<T::Error>] {
        match self {
            Self::Transport(failures) => failures,
            _ => &[],
        }
    }
}

impl<T: Transport> From<FontError> for Error<T> {
    fn from(error: FontError) -> Self {
        Self::Font(error)
    }
}

impl<T: Transport> core::fmt::Display for Error<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(failures) => match failures.first() {
                Some(first) => write!(
                    f,
                    "{} request(s) failed, first at #{} ({:?}): {:?}",
                    failures.len(),
                    first.index,
                    first.primitive,
                    first.error
                ),
                None => write!(f, "Transport error"),
            },
            Self::InvalidByte { input } => write!(f, "Invalid hex byte: {input:?}"),
            Self::InvalidState { required, actual } => {
                write!(f, "Display is {actual:?}, operation requires {required:?}")
            }
            Self::InvalidPosition { column, page } => {
                write!(f, "Invalid text position: column={column}, page={page}")
            }
            Self::BufferSize { required, provided } => {
                write!(
                    f,
                    "Frame buffer size mismatch: required {required} bytes, provided {provided}"
                )
            }
            Self::Font(e) => write!(f, "{e}"),
        }
    }
}

impl<T: Transport + core::fmt::Debug> core::error::Error for Error<T> {}

/// Errors raised when selecting a font
#[derive(Clone, Debug, PartialEq)]
pub enum FontError {
    /// No preset with this name exists
    UnknownFont(String),
    /// Glyph data with an odd byte count
    ///
    /// Every column carries one byte per page of the 16-row strip.
    OddGlyph {
        /// Character the glyph belongs to
        character: char,
        /// Byte count found
        len: usize,
    },
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownFont(name) => write!(f, "Unknown font: {name:?}"),
            Self::OddGlyph { character, len } => {
                write!(f, "Glyph for {character:?} has odd length {len}")
            }
        }
    }
}

impl core::error::Error for FontError {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderError {
    /// Bus endpoint was not specified
    ///
    /// [`Builder::endpoint()`](crate::config::Builder::endpoint) must be called before building.
    MissingEndpoint,
    /// An endpoint field is empty or contains characters reserved by the
    /// request grammar
    InvalidEndpoint {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: String,
    },
    /// Invalid panel geometry
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of columns requested
        columns: u16,
        /// Number of pages requested
        pages: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingEndpoint => write!(f, "Bus endpoint must be specified"),
            Self::InvalidEndpoint { field, value } => {
                write!(f, "Invalid {field}: {value:?}")
            }
            Self::InvalidDimensions { columns, pages } => write!(
                f,
                "Invalid dimensions {columns} columns x {pages} pages (max {}x{}, at least 2 pages)",
                crate::config::MAX_COLUMNS,
                crate::config::MAX_PAGES
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
