//! Capability fallback: map a requested [`Color`] down to what the target can show.
//!
//! Resolution is deterministic and pure. Semantic names go through the [`Theme`]
//! first, basic ANSI names map to the 16-color palette, and everything else is
//! quantized to the best tier the [`Capabilities`] allow.

use super::capabilities::{Capabilities, ColorSupport};
use super::model::{ansi_name_index, palette_rgb, Color, TerminalColor};
use super::theme::Theme;

/// Channel levels of the 6x6x6 color cube (indices 16–231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Resolve `color` for the given target. `None` means "emit no color command".
pub fn resolve(
    color: &Color,
    caps: &Capabilities,
    theme: &Theme,
    is_foreground: bool,
) -> Option<TerminalColor> {
    let support = caps.color_support();
    if support == ColorSupport::NoColor {
        return None;
    }

    let resolved = match color {
        Color::None => None,
        Color::Rgb(r, g, b) => Some(from_rgb(*r, *g, *b, support)),
        Color::Indexed(index) => Some(from_index(*index, support)),
        Color::Named(name) => match theme.get(name) {
            // Theme entries are concrete; a name mapping to another name only gets
            // the basic ANSI lookup.
            Some(Color::Named(inner)) => ansi_name_index(inner).map(TerminalColor::Ansi16),
            Some(themed) => return resolve(themed, caps, theme, is_foreground),
            None => ansi_name_index(name).map(TerminalColor::Ansi16),
        },
    };

    resolved.map(|c| match c {
        // Basic backgrounds only reliably render the dim half of the palette.
        TerminalColor::Ansi16(i) if !is_foreground && support == ColorSupport::Basic && i >= 8 => {
            TerminalColor::Ansi16(i - 8)
        }
        other => other,
    })
}

/// Parse `text` with [`Color::parse`] and resolve it. Malformed text resolves to `None`.
pub fn resolve_str(
    text: &str,
    caps: &Capabilities,
    theme: &Theme,
    is_foreground: bool,
) -> Option<TerminalColor> {
    Color::parse(text).and_then(|color| resolve(&color, caps, theme, is_foreground))
}

fn from_rgb(r: u8, g: u8, b: u8, support: ColorSupport) -> TerminalColor {
    match support {
        ColorSupport::TrueColor => TerminalColor::Rgb { r, g, b },
        ColorSupport::Ansi256 => TerminalColor::Ansi256(quantize_256(r, g, b)),
        ColorSupport::Basic | ColorSupport::NoColor => TerminalColor::Ansi16(quantize_16(r, g, b)),
    }
}

fn from_index(index: u8, support: ColorSupport) -> TerminalColor {
    match support {
        ColorSupport::TrueColor | ColorSupport::Ansi256 => TerminalColor::Ansi256(index),
        ColorSupport::Basic | ColorSupport::NoColor if index < 16 => TerminalColor::Ansi16(index),
        ColorSupport::Basic | ColorSupport::NoColor => {
            let (r, g, b) = palette_rgb(index);
            TerminalColor::Ansi16(quantize_16(r, g, b))
        }
    }
}

/// Nearest 256-palette index. Pure grays use the 24-step ramp (232–255).
pub fn quantize_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            v => 232 + ((v - 8) / 10).min(23),
        };
    }
    16 + 36 * nearest_level(r) + 6 * nearest_level(g) + nearest_level(b)
}

fn nearest_level(v: u8) -> u8 {
    let mut best = 0;
    let mut best_distance = u8::MAX;
    for (i, level) in CUBE_LEVELS.iter().enumerate() {
        let distance = v.abs_diff(*level);
        if distance < best_distance {
            best = i as u8;
            best_distance = distance;
        }
    }
    best
}

/// Nearest basic palette index (0–15) by brightness and dominant channel.
pub fn quantize_16(r: u8, g: u8, b: u8) -> u8 {
    let brightness = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
    if brightness < 64 {
        return 0;
    }
    if brightness > 192 {
        return 15;
    }
    let bright = brightness > 128;

    let base = if r > g && r > b {
        1
    } else if g > r && g > b {
        2
    } else if b > r && b > g {
        4
    } else {
        return if bright { 7 } else { 8 };
    };
    if bright {
        base + 8
    } else {
        base
    }
}
