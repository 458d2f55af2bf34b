//! Core display operations

use alloc::vec::Vec;
use log::debug;

use crate::bus::SoftI2c;
use crate::command::{
    ADDRESSING_HORIZONTAL, ADDRESSING_VERTICAL, CONTROL_COMMAND, CONTROL_DATA, DISPLAY_ON,
    SET_ADDRESSING_MODE, SET_CHARGE_PUMP, SET_CLOCK_DIVIDE, SET_COLUMN_ADDRESS, SET_CONTRAST,
    SET_INVERSE, SET_NORMAL, SET_PAGE_ADDRESS,
};
use crate::config::Config;
use crate::error::Error;
use crate::font::{DEFAULT_FONT, FontTable};
use crate::render;
use crate::transport::Transport;

type DisplayResult<T> = core::result::Result<(), Error<T>>;

/// Text written by [`Display::prepare_display`]
pub const PLACEHOLDER_TEXT: &str = "test";

/// Controller state as known to the driver
///
/// States are ordered; an operation that requires a state accepts any later
/// one as well.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DisplayState {
    /// Nothing sent yet
    #[default]
    Uninitialized,
    /// Init sequence sent, panel on
    Initialized,
    /// Whole framebuffer written
    Cleared,
    /// Text window set
    Positioned,
}

/// Display driver for an SSD1306 on a remote soft-I2C bus
///
/// Every public operation runs its whole command sequence even when requests
/// fail, then reports the failed requests as [`Error::Transport`].
pub struct Display<T>
where
    T: Transport,
{
    /// Emulated bus
    bus: SoftI2c<T>,
    /// Display configuration
    config: Config,
    /// Loaded font
    fonts: FontTable,
    /// Current controller state
    state: DisplayState,
}

impl<T> Display<T>
where
    T: Transport,
{
    /// Create a new Display instance on the lines named in `config.endpoint`
    pub fn new(transport: T, config: Config) -> Self {
        let bus = SoftI2c::new(transport, &config.endpoint);
        Self {
            bus,
            config,
            fonts: FontTable::new(),
            state: DisplayState::Uninitialized,
        }
    }

    /// Initialize the controller, clear the screen and write a placeholder
    pub fn prepare_display(&mut self) -> DisplayResult<T> {
        debug!("preparing display");
        self.init_sequence();
        self.clear_sequence()?;
        self.text_sequence(PLACEHOLDER_TEXT, DEFAULT_FONT, 0, 0)?;
        self.finish()
    }

    /// Send the controller init sequence and turn the panel on
    pub fn initialize(&mut self) -> DisplayResult<T> {
        self.init_sequence();
        self.finish()
    }

    /// Blank the whole framebuffer
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the display is not initialized.
    pub fn clear(&mut self) -> DisplayResult<T> {
        self.clear_sequence()?;
        self.finish()
    }

    /// Set the text window to a two-page strip starting at `column`, `page`
    ///
    /// The window is sent every time, even if it did not change. The end page
    /// is always `page + 1`, also on the last page, where the controller
    /// receives an end page one past the panel.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the display has not been cleared, and
    /// `Error::InvalidPosition` if `column` or `page` is off the panel.
    pub fn position(&mut self, column: u8, page: u8) -> DisplayResult<T> {
        self.position_sequence(column, page)?;
        self.finish()
    }

    /// Write `text` in font `font` starting at `column`, `page`
    ///
    /// Characters the font has no glyph for are skipped. Each word is followed
    /// by a one-column gap.
    ///
    /// The data transfer is closed with a STOP condition, so the request stream
    /// ends with one more line-set request than a bare data write.
    ///
    /// # Errors
    ///
    /// Returns `Error::Font` for an unknown font and the errors of
    /// [`position`](Self::position); no request is sent in these cases.
    pub fn write_text(
        &mut self,
        text: &str,
        font: &str,
        column: u8,
        page: u8,
    ) -> DisplayResult<T> {
        self.text_sequence(text, font, column, page)?;
        self.finish()
    }

    /// Write a full frame of GDDRAM bytes
    ///
    /// The buffer is page-major: `columns` bytes for page 0, then page 1, etc.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the display is not initialized and
    /// `Error::BufferSize` if `frame` does not match the panel geometry.
    pub fn draw_frame(&mut self, frame: &[u8]) -> DisplayResult<T> {
        let required = self.config.dimensions.buffer_size();
        if frame.len() != required {
            return Err(Error::BufferSize {
                required,
                provided: frame.len(),
            });
        }
        self.fill_screen(frame.iter().copied())?;
        self.finish()
    }

    /// Current controller state
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Panel dimensions
    pub fn dimensions(&self) -> &crate::config::Dimensions {
        &self.config.dimensions
    }

    /// Loaded font table
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// The emulated bus
    pub fn bus(&self) -> &SoftI2c<T> {
        &self.bus
    }

    /// Consume the driver and return the transport
    pub fn release(self) -> T {
        self.bus.release()
    }

    fn init_sequence(&mut self) {
        debug!("initializing controller");
        self.bus.stop();
        self.bus.init();
        self.bus.start();

        self.bus.write_byte(self.config.address);
        self.bus.write_byte(CONTROL_COMMAND);
        for byte in self.init_commands() {
            self.bus.write_byte(byte);
        }

        self.bus.stop();
        self.state = DisplayState::Initialized;
    }

    /// Init command bytes; two-byte commands keep their operand next to them
    fn init_commands(&self) -> [u8; 11] {
        [
            DISPLAY_ON,
            SET_CLOCK_DIVIDE,
            self.config.clock_divide,
            SET_CONTRAST,
            self.config.contrast,
            SET_CHARGE_PUMP,
            self.config.charge_pump,
            // Again, now that the pump is running
            DISPLAY_ON,
            self.config.rotation.segment_remap(),
            self.config.rotation.com_scan(),
            if self.config.inverted {
                SET_INVERSE
            } else {
                SET_NORMAL
            },
        ]
    }

    fn clear_sequence(&mut self) -> DisplayResult<T> {
        debug!("clearing screen");
        let size = self.config.dimensions.buffer_size();
        self.fill_screen(core::iter::repeat_n(0x00, size))
    }

    fn fill_screen(&mut self, bytes: impl IntoIterator<Item = u8>) -> DisplayResult<T> {
        self.require(DisplayState::Initialized)?;
        let last_column = self.config.dimensions.last_column();
        let last_page = self.config.dimensions.last_page();

        self.send_commands(&[
            SET_ADDRESSING_MODE,
            ADDRESSING_HORIZONTAL,
            SET_COLUMN_ADDRESS,
            0x00,
            last_column,
            SET_PAGE_ADDRESS,
            0x00,
            last_page,
        ]);

        self.bus.start();
        self.bus.write_byte(self.config.address);
        self.bus.write_byte(CONTROL_DATA);
        for byte in bytes {
            self.bus.write_byte(byte);
        }
        self.bus.stop();

        self.state = DisplayState::Cleared;
        Ok(())
    }

    fn position_sequence(&mut self, column: u8, page: u8) -> DisplayResult<T> {
        self.require(DisplayState::Cleared)?;
        let dims = self.config.dimensions;
        if column > dims.last_column() || page > dims.last_page() {
            return Err(Error::InvalidPosition { column, page });
        }
        debug!("positioning at column {column}, page {page}");

        self.send_commands(&[
            SET_ADDRESSING_MODE,
            ADDRESSING_VERTICAL,
            SET_COLUMN_ADDRESS,
            column,
            dims.last_column(),
            SET_PAGE_ADDRESS,
            page,
            page + 1,
        ]);

        self.state = DisplayState::Positioned;
        Ok(())
    }

    fn text_sequence(
        &mut self,
        text: &str,
        font: &str,
        column: u8,
        page: u8,
    ) -> DisplayResult<T> {
        self.fonts.populate(font)?;
        self.position_sequence(column, page)?;
        debug!("writing {text:?}");

        self.bus.start();
        self.bus.write_byte(self.config.address);
        self.bus.write_byte(CONTROL_DATA);
        for word in render::words(text) {
            let bytes: Vec<u8> = render::word_bytes(word, &self.fonts);
            for byte in bytes {
                self.bus.write_byte(byte);
            }
            for byte in render::WORD_SEPARATOR {
                self.bus.write_byte(byte);
            }
        }
        self.bus.stop();
        Ok(())
    }

    /// One command transfer: START, address, command control byte, `bytes`, STOP
    fn send_commands(&mut self, bytes: &[u8]) {
        self.bus.start();
        self.bus.write_byte(self.config.address);
        self.bus.write_byte(CONTROL_COMMAND);
        for &byte in bytes {
            self.bus.write_byte(byte);
        }
        self.bus.stop();
    }

    fn require(&self, required: DisplayState) -> DisplayResult<T> {
        if self.state < required {
            return Err(Error::InvalidState {
                required,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn finish(&mut self) -> DisplayResult<T> {
        let failures = self.bus.take_failures();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Transport(failures))
        }
    }
}
