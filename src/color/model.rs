//! Requested colors and terminal-encodable colors.

use std::fmt;

/// A color as requested by a node: explicit RGB, palette index, semantic name, or none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// No color: the terminal default is kept.
    #[default]
    None,
    Rgb(u8, u8, u8),
    /// Index into the 256-color palette.
    Indexed(u8),
    /// Semantic (`accent`, `error`, ...) or basic ANSI (`red`, `bright-blue`, ...) name.
    Named(String),
}

impl Color {
    /// Shorthand for [`Color::Rgb`].
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r, g, b)
    }

    /// Shorthand for [`Color::Named`].
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    /// Parse a color string. See [`super::token::parse_color`].
    pub fn parse(input: &str) -> Option<Color> {
        super::token::parse_color(input)
    }
}

/// A color the output target can encode directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalColor {
    Rgb { r: u8, g: u8, b: u8 },
    /// 256-color palette index.
    Ansi256(u8),
    /// Basic palette index, 0–15.
    Ansi16(u8),
}

impl fmt::Display for TerminalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalColor::Rgb { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            TerminalColor::Ansi256(i) => write!(f, "ansi256({i})"),
            TerminalColor::Ansi16(i) => write!(f, "ansi16({i})"),
        }
    }
}

/// Palette index of a basic ANSI color name.
///
/// Accepts `black`..`white`, their `bright-` variants (also `bright_` / `light-`),
/// and `gray`/`grey` for bright black.
pub fn ansi_name_index(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase().replace('_', "-");
    let (bright, base) = match lower
        .strip_prefix("bright-")
        .or_else(|| lower.strip_prefix("light-"))
    {
        Some(rest) => (true, rest),
        None => (false, lower.as_str()),
    };
    let index = match base {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        "gray" | "grey" if !bright => return Some(8),
        _ => return None,
    };
    Some(if bright { index + 8 } else { index })
}

/// Approximate RGB value of a 256-palette index (xterm defaults).
pub fn palette_rgb(index: u8) -> (u8, u8, u8) {
    const BASIC: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    match index {
        0..=15 => BASIC[index as usize],
        16..=231 => {
            let n = index - 16;
            (
                LEVELS[(n / 36) as usize],
                LEVELS[((n / 6) % 6) as usize],
                LEVELS[(n % 6) as usize],
            )
        }
        _ => {
            let v = 8 + 10 * (index - 232);
            (v, v, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_names() {
        assert_eq!(ansi_name_index("red"), Some(1));
        assert_eq!(ansi_name_index("Bright-Red"), Some(9));
        assert_eq!(ansi_name_index("bright_white"), Some(15));
        assert_eq!(ansi_name_index("grey"), Some(8));
        assert_eq!(ansi_name_index("accent"), None);
    }

    #[test]
    fn palette_cube_and_ramp() {
        assert_eq!(palette_rgb(16), (0, 0, 0));
        assert_eq!(palette_rgb(231), (255, 255, 255));
        assert_eq!(palette_rgb(196), (255, 0, 0));
        assert_eq!(palette_rgb(232), (8, 8, 8));
        assert_eq!(palette_rgb(255), (238, 238, 238));
    }

    #[test]
    fn terminal_color_display() {
        assert_eq!(TerminalColor::Rgb { r: 255, g: 0, b: 16 }.to_string(), "#ff0010");
        assert_eq!(TerminalColor::Ansi256(42).to_string(), "ansi256(42)");
    }
}
