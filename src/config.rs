//! Display configuration types and builder

use alloc::string::{String, ToString};

use crate::command::{
    CHARGE_PUMP_ENABLE, COM_SCAN_DECREMENT, COM_SCAN_INCREMENT, SEGMENT_REMAP_NORMAL,
    SEGMENT_REMAP_REVERSED,
};
pub use crate::error::BuilderError;

/// Maximum number of columns (segment outputs) on an SSD1306
pub const MAX_COLUMNS: u16 = 128;

/// Maximum number of 8-row pages (64 common outputs / 8) on an SSD1306
pub const MAX_PAGES: u16 = 8;

/// Default per-request timeout for the HTTP transport in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 1_000;

/// Characters reserved by the request grammar or the URL around it
const RESERVED_IN_LINE: &[char] = &[';', ':', '&', '?', '#', '/', '='];
const RESERVED_IN_PATH: &[char] = &['/', '?', '#', '&'];

/// Remote controller and the two GPIO lines that emulate SDA and SCL
///
/// Immutable once constructed.
///
/// ```
/// use megad_oled::BusEndpoint;
///
/// let endpoint = BusEndpoint::new("192.168.0.14", "sec", "30", "31");
/// assert!(endpoint.is_ok());
///
/// // Empty credential
/// assert!(BusEndpoint::new("192.168.0.14", "", "30", "31").is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BusEndpoint {
    host: String,
    credential: String,
    data_line: String,
    clock_line: String,
}

impl BusEndpoint {
    /// Create a new endpoint with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidEndpoint` if any field is empty, contains
    /// whitespace, or contains a character that would break the URL
    /// (`/ ? # &` for host and credential) or the query grammar
    /// (`; : & ? # / =` for line identifiers).
    pub fn new(
        host: &str,
        credential: &str,
        data_line: &str,
        clock_line: &str,
    ) -> Result<Self, BuilderError> {
        check_field("host", host, RESERVED_IN_PATH)?;
        check_field("credential", credential, RESERVED_IN_PATH)?;
        check_field("data_line", data_line, RESERVED_IN_LINE)?;
        check_field("clock_line", clock_line, RESERVED_IN_LINE)?;
        Ok(Self {
            host: host.to_string(),
            credential: credential.to_string(),
            data_line: data_line.to_string(),
            clock_line: clock_line.to_string(),
        })
    }

    /// Controller host, optionally with `:port`
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path credential of the controller
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Identifier of the line used as SDA
    pub fn data_line(&self) -> &str {
        &self.data_line
    }

    /// Identifier of the line used as SCL
    pub fn clock_line(&self) -> &str {
        &self.clock_line
    }
}

fn check_field(field: &'static str, value: &str, reserved: &[char]) -> Result<(), BuilderError> {
    let bad = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || reserved.contains(&c));
    if bad {
        return Err(BuilderError::InvalidEndpoint {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Panel geometry in columns and 8-row pages
///
/// Only obtainable through [`Dimensions::new`] or the presets, so every value
/// fits the controller's address window.
///
/// ```compile_fail
/// use megad_oled::Dimensions;
///
/// let dims = Dimensions { columns: 0, pages: 8 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    columns: u16,
    pages: u16,
}

impl Dimensions {
    /// 128x64 panel, the common SSD1306 module
    pub const SSD1306_128X64: Self = Self {
        columns: 128,
        pages: 8,
    };

    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - columns == 0 or columns > MAX_COLUMNS
    /// - pages < 2 (a text strip spans two pages) or pages > MAX_PAGES
    pub fn new(columns: u16, pages: u16) -> Result<Self, BuilderError> {
        if columns == 0 || columns > MAX_COLUMNS {
            return Err(BuilderError::InvalidDimensions { columns, pages });
        }
        if !(2..=MAX_PAGES).contains(&pages) {
            return Err(BuilderError::InvalidDimensions { columns, pages });
        }
        Ok(Self { columns, pages })
    }

    /// Number of columns (width in pixels)
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of pages (height in pixels / 8)
    pub fn pages(&self) -> u16 {
        self.pages
    }

    /// Framebuffer size in bytes (one byte per column per page)
    pub fn buffer_size(&self) -> usize {
        self.columns as usize * self.pages as usize
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.pages * 8
    }

    // columns is 1..=128 and pages 2..=8, so neither end underflows or truncates
    pub(crate) fn last_column(&self) -> u8 {
        (self.columns - 1) as u8
    }

    pub(crate) fn last_page(&self) -> u8 {
        (self.pages - 1) as u8
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::SSD1306_128X64
    }
}

/// Display rotation relative to the module's mounting
///
/// Implemented by the controller through segment re-map and COM scan
/// direction; no pixel data is transformed on the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// Header pins at the top (segment re-map reversed, COM scan decrement)
    #[default]
    Rotate0,
    /// Upside down
    Rotate180,
}

impl Rotation {
    /// Segment re-map command for this rotation
    pub fn segment_remap(self) -> u8 {
        match self {
            Self::Rotate0 => SEGMENT_REMAP_REVERSED,
            Self::Rotate180 => SEGMENT_REMAP_NORMAL,
        }
    }

    /// COM output scan direction command for this rotation
    pub fn com_scan(self) -> u8 {
        match self {
            Self::Rotate0 => COM_SCAN_DECREMENT,
            Self::Rotate180 => COM_SCAN_INCREMENT,
        }
    }
}

/// Display configuration
///
/// This struct holds all configurable parameters for the controller and the
/// remote bus. Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Remote controller and bus lines
    pub endpoint: BusEndpoint,
    /// Panel geometry
    pub dimensions: Dimensions,
    /// Display rotation
    pub rotation: Rotation,
    /// Device address byte including the write bit
    pub address: u8,
    /// Contrast register value
    pub contrast: u8,
    /// Clock divide ratio / oscillator frequency register value
    pub clock_divide: u8,
    /// Charge pump register value
    pub charge_pump: u8,
    /// Whether lit pixels are drawn as 0 instead of 1
    pub inverted: bool,
    /// Per-request timeout in milliseconds (0 disables it)
    pub request_timeout_ms: u32,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use megad_oled::{Builder, BusEndpoint, Rotation};
///
/// let endpoint = match BusEndpoint::new("192.168.0.14", "sec", "30", "31") {
///     Ok(endpoint) => endpoint,
///     Err(_) => return,
/// };
/// let config = match Builder::new().endpoint(endpoint).rotation(Rotation::Rotate0).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.dimensions.buffer_size(), 1024);
/// ```
#[must_use]
pub struct Builder {
    /// Remote controller and bus lines (required)
    endpoint: Option<BusEndpoint>,
    /// Panel geometry
    dimensions: Dimensions,
    /// Display rotation
    rotation: Rotation,
    /// Device address byte including the write bit
    address: u8,
    /// Contrast register value
    contrast: u8,
    /// Clock divide register value
    clock_divide: u8,
    /// Charge pump register value
    charge_pump: u8,
    /// Inverse display
    inverted: bool,
    /// Per-request timeout in milliseconds
    request_timeout_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            endpoint: None,
            dimensions: Dimensions::SSD1306_128X64,
            rotation: Rotation::Rotate0,
            // 0x3C << 1
            address: crate::command::DEVICE_ADDRESS_WRITE,
            contrast: 0xEE,
            // Reset default: divide ratio 1, mid oscillator frequency
            clock_divide: 0x80,
            charge_pump: CHARGE_PUMP_ENABLE,
            inverted: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote bus endpoint (required)
    pub fn endpoint(mut self, endpoint: BusEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set panel dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the device address byte (7-bit address shifted left, write bit clear)
    pub fn address(mut self, value: u8) -> Self {
        self.address = value;
        self
    }

    /// Set contrast
    pub fn contrast(mut self, value: u8) -> Self {
        self.contrast = value;
        self
    }

    /// Set clock divide ratio / oscillator frequency
    pub fn clock_divide(mut self, value: u8) -> Self {
        self.clock_divide = value;
        self
    }

    /// Set charge pump register value
    pub fn charge_pump(mut self, value: u8) -> Self {
        self.charge_pump = value;
        self
    }

    /// Set inverse display
    pub fn inverted(mut self, value: bool) -> Self {
        self.inverted = value;
        self
    }

    /// Set the per-request timeout in milliseconds (0 disables it)
    pub fn request_timeout_ms(mut self, value: u32) -> Self {
        self.request_timeout_ms = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingEndpoint` if the endpoint was not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            endpoint: self.endpoint.ok_or(BuilderError::MissingEndpoint)?,
            dimensions: self.dimensions,
            rotation: self.rotation,
            address: self.address,
            contrast: self.contrast,
            clock_divide: self.clock_divide,
            charge_pump: self.charge_pump,
            inverted: self.inverted,
            request_timeout_ms: self.request_timeout_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_rejects_reserved_line_characters() {
        for line in ["30;31", "30:1", "a&b", "x=y", "", "3 0"] {
            let result = BusEndpoint::new("10.0.0.2", "sec", line, "31");
            assert!(
                matches!(
                    result,
                    Err(BuilderError::InvalidEndpoint {
                        field: "data_line",
                        ..
                    })
                ),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn test_endpoint_rejects_slash_in_credential() {
        let result = BusEndpoint::new("10.0.0.2", "se/c", "30", "31");
        assert!(matches!(
            result,
            Err(BuilderError::InvalidEndpoint {
                field: "credential",
                ..
            })
        ));
    }

    #[test]
    fn test_endpoint_accepts_host_with_port() {
        let endpoint = BusEndpoint::new("10.0.0.2:8080", "sec", "30", "31").unwrap();
        assert_eq!(endpoint.host(), "10.0.0.2:8080");
        assert_eq!(endpoint.data_line(), "30");
        assert_eq!(endpoint.clock_line(), "31");
    }

    #[test]
    fn test_dimensions_bounds() {
        assert!(Dimensions::new(128, 8).is_ok());
        assert!(Dimensions::new(128, 4).is_ok());
        assert!(Dimensions::new(0, 8).is_err());
        assert!(Dimensions::new(129, 8).is_err());
        assert!(Dimensions::new(128, 1).is_err());
        assert!(Dimensions::new(128, 9).is_err());
    }

    #[test]
    fn test_window_ends_cover_every_valid_geometry() {
        for columns in 1..=MAX_COLUMNS {
            for pages in 2..=MAX_PAGES {
                let dims = Dimensions::new(columns, pages).unwrap();
                assert_eq!(u16::from(dims.last_column()) + 1, columns);
                assert_eq!(u16::from(dims.last_page()) + 1, pages);
                assert_eq!(dims.columns(), columns);
                assert_eq!(dims.pages(), pages);
            }
        }
    }

    #[test]
    fn test_invalid_geometry_never_reaches_config() {
        assert_eq!(
            Dimensions::new(0, 8),
            Err(BuilderError::InvalidDimensions {
                columns: 0,
                pages: 8
            })
        );
        assert_eq!(
            Dimensions::new(300, 8),
            Err(BuilderError::InvalidDimensions {
                columns: 300,
                pages: 8
            })
        );
    }

    #[test]
    fn test_default_buffer_size() {
        assert_eq!(Dimensions::default().buffer_size(), 1024);
        assert_eq!(Dimensions::default().height(), 64);
    }

    #[test]
    fn test_builder_requires_endpoint() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingEndpoint)
        ));
    }

    #[test]
    fn test_rotation_commands() {
        assert_eq!(Rotation::Rotate0.segment_remap(), 0xA1);
        assert_eq!(Rotation::Rotate0.com_scan(), 0xC8);
        assert_eq!(Rotation::Rotate180.segment_remap(), 0xA0);
        assert_eq!(Rotation::Rotate180.com_scan(), 0xC0);
    }
}
