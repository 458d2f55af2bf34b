//! Text to GDDRAM byte layout
//!
//! Text is split into words on ASCII space. Each word becomes the glyph bytes
//! of its characters followed by a two-byte blank column that separates it
//! from the next word. Characters without a glyph are skipped, so the output
//! width does not follow the character count.
//!
//! Glyphs store each column as (lower page, upper page). With the controller
//! in vertical addressing over a two-page window the upper page is written
//! first, so every byte pair is swapped on the way out.
//!
//! ```
//! use megad_oled::font::{FontTable, DEFAULT_FONT};
//! use megad_oled::render::layout;
//!
//! let mut fonts = FontTable::new();
//! assert!(fonts.populate(DEFAULT_FONT).is_ok());
//!
//! // '!' is stored as [0x2F, 0xC0]
//! assert_eq!(layout("!", &fonts), [0xC0, 0x2F, 0x00, 0x00]);
//! ```

use alloc::vec::Vec;
use log::trace;

use crate::font::FontTable;

/// Blank column emitted after every word
pub const WORD_SEPARATOR: [u8; 2] = [0x00, 0x00];

/// Words of `text`, split on ASCII space
///
/// Empty words between consecutive spaces are kept (each still gets a
/// separator); empty words at the end are dropped. An empty input is one
/// empty word.
pub fn words(text: &str) -> Vec<&str> {
    let mut words: Vec<&str> = text.split(' ').collect();
    if words.len() > 1 {
        while words.last().is_some_and(|word| word.is_empty()) {
            words.pop();
        }
    }
    words
}

/// Column bytes of one word, in transfer order
pub fn word_bytes(word: &str, fonts: &FontTable) -> Vec<u8> {
    let mut raster = Vec::new();
    for character in word.chars() {
        match fonts.lookup(character) {
            Some(glyph) => raster.extend_from_slice(glyph.bytes()),
            None => trace!("no glyph for {character:?}, skipped"),
        }
    }

    // Glyph lengths are even, so the concatenation splits into whole columns
    raster
        .chunks_exact(2)
        .flat_map(|column| [column[1], column[0]])
        .collect()
}

/// Every byte streamed for `text`, separators included
pub fn layout(text: &str, fonts: &FontTable) -> Vec<u8> {
    let mut out = Vec::new();
    for word in words(text) {
        out.extend(word_bytes(word, fonts));
        out.extend_from_slice(&WORD_SEPARATOR);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::DEFAULT_FONT;

    fn default_fonts() -> FontTable {
        let mut fonts = FontTable::new();
        fonts.populate(DEFAULT_FONT).unwrap();
        fonts
    }

    #[test]
    fn test_words_split_on_space() {
        assert_eq!(words("a b"), ["a", "b"]);
        assert_eq!(words("a  b"), ["a", "", "b"]);
        assert_eq!(words(" a"), ["", "a"]);
    }

    #[test]
    fn test_words_drop_trailing_empties() {
        assert_eq!(words("a "), ["a"]);
        assert_eq!(words("a   "), ["a"]);
        assert!(words("  ").is_empty());
        assert_eq!(words(""), [""]);
    }

    #[test]
    fn test_unknown_glyphs_contribute_nothing() {
        let fonts = default_fonts();
        assert_eq!(layout("a b", &fonts), [0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_byte_pairs_are_swapped() {
        let fonts = default_fonts();
        assert_eq!(
            word_bytes("t", &fonts),
            [0x00, 0x01, 0xC0, 0x1F, 0x00, 0x21, 0x00, 0x21]
        );
    }

    #[test]
    fn test_unknown_characters_compress_the_word() {
        let fonts = default_fonts();
        assert_eq!(word_bytes("tat", &fonts), word_bytes("tt", &fonts));
    }

    #[test]
    fn test_layout_of_test_word() {
        let fonts = default_fonts();
        let bytes = layout("test", &fonts);
        // t(4) e(5) s(4) t(4) columns, plus separator
        assert_eq!(bytes.len(), (4 + 5 + 4 + 4) * 2 + 2);
        assert_eq!(&bytes[..4], &[0x00, 0x01, 0xC0, 0x1F]);
        assert_eq!(&bytes[8..12], &[0x00, 0x1E, 0x00, 0x25]);
        assert_eq!(&bytes[bytes.len() - 2..], &WORD_SEPARATOR);
    }

    #[test]
    fn test_empty_text_is_one_separator() {
        let fonts = default_fonts();
        assert_eq!(layout("", &fonts), WORD_SEPARATOR);
    }
}
