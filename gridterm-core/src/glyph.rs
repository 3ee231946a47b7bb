use crate::renderer::Color;

/// One character cell's rendered identity: a character plus its two colors
///
/// Glyphs are plain `Copy` values, so the same glyph can back any number of
/// cells without sharing or reference counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    pub const PLAYER: Glyph = Glyph::new('@', Color::WHITE, Color::BLACK);
    pub const WALL: Glyph = Glyph::new('#', Color::LIGHT_GRAY, Color::BLACK);
    pub const SPACE: Glyph = Glyph::new('.', Color::DARK_GRAY, Color::BLACK);

    #[inline]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Same colors, different character
    #[inline]
    pub const fn with_char(self, ch: char) -> Self {
        Self { ch, ..self }
    }
}
