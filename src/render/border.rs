//! Panel border character sets.

/// Border style of a bordered panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// ─ │ ┌ ┐ └ ┘
    #[default]
    Square,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Heavy,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double,
    /// - | + + + +
    Ascii,
}

/// The six glyphs a box is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl BorderStyle {
    /// Parse a style name. Unknown names fall back to [`BorderStyle::Square`].
    pub fn from_name(name: &str) -> BorderStyle {
        match name.to_ascii_lowercase().as_str() {
            "rounded" => BorderStyle::Rounded,
            "heavy" | "bold" | "thick" => BorderStyle::Heavy,
            "double" => BorderStyle::Double,
            "ascii" => BorderStyle::Ascii,
            _ => BorderStyle::Square,
        }
    }

    pub const fn chars(self) -> BorderChars {
        let (horizontal, vertical, top_left, top_right, bottom_left, bottom_right) = match self {
            BorderStyle::Square => ('─', '│', '┌', '┐', '└', '┘'),
            BorderStyle::Rounded => ('─', '│', '╭', '╮', '╰', '╯'),
            BorderStyle::Heavy => ('━', '┃', '┏', '┓', '┗', '┛'),
            BorderStyle::Double => ('═', '║', '╔', '╗', '╚', '╝'),
            BorderStyle::Ascii => ('-', '|', '+', '+', '+', '+'),
        };
        BorderChars {
            horizontal,
            vertical,
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }
}
