//! A single screen position's content (a [`Grapheme`]) and appearance
//! (a [`Style`]), bundled as a [`Cell`].

#![warn(clippy::pedantic)]

use bitflags::bitflags;
use pc_color::Color;

/// A single UTF-8 scalar value stored in four bytes, zero-padded.
///
/// Combining marks are not modeled: each code point occupies exactly one
/// cell. A grapheme whose four bytes are all zero is "empty."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grapheme([u8; 4]);

impl Grapheme {
    pub const EMPTY: Grapheme = Grapheme([0; 4]);

    /// Build a grapheme from a decoded UTF-8 scalar's encoded bytes
    /// (1 to 4 bytes, e.g. from `char::encode_utf8`).
    #[must_use]
    pub fn from_utf8_bytes(bytes: &[u8]) -> Self {
        debug_assert!((1..=4).contains(&bytes.len()));
        let mut storage = [0u8; 4];
        storage[..bytes.len()].copy_from_slice(bytes);
        Grapheme(storage)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 4]
    }

    /// The number of significant leading bytes, derived from the UTF-8
    /// leading byte's high bits. Zero for an empty grapheme.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        match self.0[0] {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // Not a valid leading byte; treat defensively as one byte so we
            // never read past what was actually written.
            _ => 1,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }
}

bitflags! {
    /// Which of a [`Style`]'s attributes are set. Mirrors the four boolean
    /// attributes of the rendered model: custom foreground present, custom
    /// background present, bold, underline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u8 {
        const CUSTOM_FG = 0b0001;
        const CUSTOM_BG = 0b0010;
        const BOLD      = 0b0100;
        const UNDERLINE = 0b1000;
    }
}

/// The appearance of one cell: a foreground/background color (each either
/// "default" or a specific [`Color`]) plus bold/underline.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub flags: StyleFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            flags: StyleFlags::empty(),
            fg: Color::default(),
            bg: Color::default(),
        }
    }
}

impl Style {
    #[must_use]
    pub fn has_custom_fg(&self) -> bool {
        self.flags.contains(StyleFlags::CUSTOM_FG)
    }

    #[must_use]
    pub fn has_custom_bg(&self) -> bool {
        self.flags.contains(StyleFlags::CUSTOM_BG)
    }

    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.flags.contains(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn is_underline(&self) -> bool {
        self.flags.contains(StyleFlags::UNDERLINE)
    }
}

impl PartialEq for Style {
    /// Colors only participate in equality when their "custom" bit is set —
    /// two cells both using the default foreground compare equal regardless
    /// of whatever happens to be stored in `fg`.
    fn eq(&self, other: &Self) -> bool {
        if self.flags != other.flags {
            return false;
        }
        if self.has_custom_fg() && self.fg != other.fg {
            return false;
        }
        if self.has_custom_bg() && self.bg != other.bg {
            return false;
        }
        true
    }
}

impl Eq for Style {}

/// One grid position: a grapheme plus the style it was written with.
///
/// A cell is "empty" iff its grapheme is empty; an empty cell's `style`
/// field still holds whatever was last written there (readers are expected
/// to treat it as the default style, per the type's documented invariant,
/// rather than have every write path re-zero it).
#[derive(Debug, Clone, Copy, Default)]
pub struct Cell {
    pub grapheme: Grapheme,
    pub style: Style,
}

impl Cell {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grapheme.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Cell::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_grapheme_round_trips() {
        assert!(Grapheme::EMPTY.is_empty());
        assert_eq!(Grapheme::EMPTY.len(), 0);
        assert_eq!(Grapheme::EMPTY.as_bytes(), b"");
    }

    #[test]
    fn ascii_grapheme() {
        let g = Grapheme::from_utf8_bytes(b"a");
        assert!(!g.is_empty());
        assert_eq!(g.as_bytes(), b"a");
    }

    #[test]
    fn multibyte_grapheme() {
        let mut buf = [0u8; 4];
        let s = '€'.encode_utf8(&mut buf);
        let g = Grapheme::from_utf8_bytes(s.as_bytes());
        assert_eq!(g.as_bytes(), s.as_bytes());
    }

    #[test]
    fn style_equality_ignores_unset_colors() {
        let a = Style::default();
        let mut b = Style::default();
        b.fg = Color::new(9, 9, 9);
        assert_eq!(a, b, "fg differs but custom_fg is unset on both");

        let mut c = a;
        c.flags |= StyleFlags::CUSTOM_FG;
        c.fg = Color::new(1, 1, 1);
        let mut d = c;
        d.fg = Color::new(2, 2, 2);
        assert_ne!(c, d);
    }

    #[test]
    fn cell_clear_resets_style() {
        let mut cell = Cell {
            grapheme: Grapheme::from_utf8_bytes(b"x"),
            style: Style {
                flags: StyleFlags::BOLD,
                ..Style::default()
            },
        };
        cell.clear();
        assert!(cell.is_empty());
        assert_eq!(cell.style, Style::default());
    }
}
