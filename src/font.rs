//! Glyph tables for text rendering
//!
//! Glyphs are stored column by column for a 16-row strip: every column takes
//! two bytes, one per 8-row page, LSB at the top of the page. A glyph is as
//! wide as it needs to be, so text is proportional.
//!
//! ```
//! use megad_oled::font::{FontTable, DEFAULT_FONT};
//!
//! let mut fonts = FontTable::new();
//! assert!(fonts.populate(DEFAULT_FONT).is_ok());
//! assert_eq!(fonts.lookup('t').map(|glyph| glyph.width()), Some(4));
//! assert!(fonts.lookup('a').is_none());
//! ```

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use log::debug;

use crate::error::FontError;

/// Name of the built-in font preset
pub const DEFAULT_FONT: &str = "default";

/// Raster bytes of one character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    bytes: &'static [u8],
}

impl Glyph {
    /// Wrap glyph data
    ///
    /// # Errors
    ///
    /// Returns `FontError::OddGlyph` if `bytes` has an odd length.
    pub fn new(character: char, bytes: &'static [u8]) -> Result<Self, FontError> {
        if bytes.len() % 2 != 0 {
            return Err(FontError::OddGlyph {
                character,
                len: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Raster bytes, two per column
    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Width in columns
    pub fn width(&self) -> usize {
        self.bytes.len() / 2
    }
}

/// Character to glyph mapping for one font
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontTable {
    name: Option<String>,
    glyphs: BTreeMap<char, Glyph>,
}

impl FontTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the glyphs of the preset called `name`
    ///
    /// Loading the font that is already loaded does nothing, so calling this
    /// before every render is cheap and always leaves the same contents.
    ///
    /// # Errors
    ///
    /// Returns `FontError::UnknownFont` if no preset has this name; the table
    /// keeps its previous contents.
    pub fn populate(&mut self, name: &str) -> Result<(), FontError> {
        if self.name.as_deref() == Some(name) {
            return Ok(());
        }

        let preset = preset(name).ok_or_else(|| FontError::UnknownFont(name.to_string()))?;
        let mut glyphs = BTreeMap::new();
        for &(character, bytes) in preset {
            glyphs.insert(character, Glyph::new(character, bytes)?);
        }
        debug!("loaded font {name:?} with {} glyphs", glyphs.len());

        self.glyphs = glyphs;
        self.name = Some(name.to_string());
        Ok(())
    }

    /// Glyph for `character`, if the loaded font has one
    pub fn lookup(&self, character: char) -> Option<Glyph> {
        self.glyphs.get(&character).copied()
    }

    /// Name of the loaded font
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of glyphs loaded
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no glyphs are loaded
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

fn preset(name: &str) -> Option<&'static [(char, &'static [u8])]> {
    match name {
        DEFAULT_FONT => Some(DEFAULT_GLYPHS),
        _ => None,
    }
}

// Sampled Latin and Cyrillic subset, 16 rows high
#[rustfmt::skip]
const DEFAULT_GLYPHS: &[(char, &[u8])] = &[
    ('!', &[0x2F, 0xC0]),
    ('"', &[0x00, 0xE0, 0x00, 0x00, 0x00, 0xE0]),
    ('T', &[0x00, 0x40, 0x00, 0x40, 0x00, 0x40, 0x3F, 0xC0, 0x00, 0x40, 0x00, 0x40, 0x00, 0x40]),
    ('e', &[0x1E, 0x00, 0x25, 0x00, 0x25, 0x00, 0x25, 0x00, 0x16, 0x00]),
    ('s', &[0x26, 0x00, 0x25, 0x00, 0x29, 0x00, 0x19, 0x00]),
    ('t', &[0x01, 0x00, 0x1F, 0xC0, 0x21, 0x00, 0x21, 0x00]),
    ('Е', &[0x3F, 0xC0, 0x22, 0x40, 0x22, 0x40, 0x22, 0x40, 0x22, 0x40]),
    ('Т', &[0x00, 0x40, 0x00, 0x40, 0x00, 0x40, 0x3F, 0xC0, 0x00, 0x40, 0x00, 0x40, 0x00, 0x40]),
    ('е', &[0x1E, 0x00, 0x25, 0x00, 0x25, 0x00, 0x25, 0x00, 0x16, 0x00]),
    ('с', &[0x1E, 0x00, 0x21, 0x00, 0x21, 0x00, 0x21, 0x00, 0x12, 0x00]),
    ('т', &[0x01, 0x00, 0x01, 0x00, 0x3F, 0x00, 0x01, 0x00, 0x01, 0x00]),
];
