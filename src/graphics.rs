//! Graphics support via embedded-graphics
//!
//! [`GraphicDisplay`] wraps a [`Display`] with a page-major frame buffer and
//! implements the [`DrawTarget`] trait from the embedded-graphics ecosystem.
//! Drawing only touches the buffer; [`flush`](GraphicDisplay::flush) streams
//! it to the panel in one transfer.
//!
//! Orientation is applied by the controller (segment remap and COM scan), so
//! the buffer is always laid out in panel coordinates.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use megad_oled::{Builder, BusEndpoint, Display, GraphicDisplay, RecordingTransport};
//!
//! let endpoint = match BusEndpoint::new("192.168.0.14", "sec", "30", "31") {
//!     Ok(endpoint) => endpoint,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().endpoint(endpoint).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = GraphicDisplay::new(Display::new(RecordingTransport::new(), config));
//! if display.display_mut().initialize().is_err() {
//!     return;
//! }
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut display);
//!
//! let _ = display.flush();
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::display::Display;
use crate::error::Error;
use crate::transport::Transport;

type GraphicsResult<T> = core::result::Result<(), Error<T>>;

/// Display with a frame buffer
///
/// ## Type Parameters
///
/// * `T` - Transport implementing [`Transport`]
pub struct GraphicDisplay<T>
where
    T: Transport,
{
    /// The underlying display driver
    display: Display<T>,
    /// One bit per pixel, `columns` bytes per page
    buffer: Vec<u8>,
}

impl<T> GraphicDisplay<T>
where
    T: Transport,
{
    /// Create a new GraphicDisplay with a blank buffer sized for the panel
    pub fn new(display: Display<T>) -> Self {
        let size = display.dimensions().buffer_size();
        Self {
            display,
            buffer: vec![0x00; size],
        }
    }

    /// Fill the buffer with one color
    pub fn clear(&mut self, color: BinaryColor) {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buffer.fill(fill);
    }

    /// Send the buffer to the panel
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the display is not initialized and
    /// `Error::Transport` if requests failed.
    pub fn flush(&mut self) -> GraphicsResult<T> {
        self.display.draw_frame(&self.buffer)
    }

    /// Raw frame buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<T> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// Text operations go through here; they write to the panel directly and
    /// are overwritten by the next [`flush`](Self::flush).
    pub fn display_mut(&mut self) -> &mut Display<T> {
        &mut self.display
    }

    /// Consume the wrapper and return the driver
    pub fn release(self) -> Display<T> {
        self.display
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let columns = u32::from(self.display.dimensions().columns());
        let index = (x + (y / 8) * columns) as usize;
        let bit = 1u8 << (y % 8);

        let Some(byte) = self.buffer.get_mut(index) else {
            return;
        };
        if color.is_on() {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }
}

impl<T> DrawTarget for GraphicDisplay<T>
where
    T: Transport,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel(x, y, color);
        }

        Ok(())
    }
}

impl<T> OriginDimensions for GraphicDisplay<T>
where
    T: Transport,
{
    fn size(&self) -> Size {
        let dims = self.display.dimensions();
        Size::new(u32::from(dims.columns()), u32::from(dims.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, BusEndpoint, Dimensions};
    use crate::transport::RecordingTransport;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    fn test_display(dims: Dimensions) -> GraphicDisplay<RecordingTransport> {
        let config = Builder::new()
            .endpoint(BusEndpoint::new("10.0.0.2", "sec", "30", "31").unwrap())
            .dimensions(dims)
            .build()
            .unwrap();
        GraphicDisplay::new(Display::new(RecordingTransport::new(), config))
    }

    #[test]
    fn test_size_follows_dimensions() {
        let display = test_display(Dimensions::default());
        assert_eq!(display.size(), Size::new(128, 64));
        assert_eq!(display.buffer().len(), 1024);

        let display = test_display(Dimensions::new(64, 4).unwrap());
        assert_eq!(display.size(), Size::new(64, 32));
        assert_eq!(display.buffer().len(), 256);
    }

    #[test]
    fn test_pixels_map_to_page_bits() {
        let mut display = test_display(Dimensions::default());
        Pixel(Point::new(0, 0), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        Pixel(Point::new(3, 9), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        Pixel(Point::new(127, 63), BinaryColor::On)
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.buffer()[0], 0x01);
        assert_eq!(display.buffer()[128 + 3], 0x02);
        assert_eq!(display.buffer()[1023], 0x80);

        Pixel(Point::new(0, 0), BinaryColor::Off)
            .draw(&mut display)
            .unwrap();
        assert_eq!(display.buffer()[0], 0x00);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_ignored() {
        let mut display = test_display(Dimensions::default());
        Pixel(Point::new(-1, 0), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        Pixel(Point::new(128, 0), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        Pixel(Point::new(0, 64), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        assert!(display.buffer().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_rectangle_fills_whole_page() {
        let mut display = test_display(Dimensions::default());
        Rectangle::new(Point::new(0, 8), Size::new(2, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut display)
            .unwrap();
        assert_eq!(&display.buffer()[128..131], &[0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn test_clear_fills_buffer() {
        let mut display = test_display(Dimensions::default());
        display.clear(BinaryColor::On);
        assert!(display.buffer().iter().all(|&byte| byte == 0xFF));
        display.clear(BinaryColor::Off);
        assert!(display.buffer().iter().all(|&byte| byte == 0x00));
    }

    #[test]
    fn test_flush_requires_initialized_display() {
        let mut display = test_display(Dimensions::default());
        assert!(matches!(display.flush(), Err(Error::InvalidState { .. })));

        display.display_mut().initialize().unwrap();
        display.clear(BinaryColor::On);
        display.flush().unwrap();

        let sent = display.display().bus().transport().requests();
        // init (17), window transfer (12), START, address, data control
        assert_eq!(sent.len(), 17 + 12 + 3 + 1024 + 1);
        assert_eq!(sent[17 + 15], "pt=30&i2c=255&scl=31:1;31:0;");
        assert_eq!(sent[sent.len() - 1], "cmd=30:0;31:1;30:1");
    }
}
