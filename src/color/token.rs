//! logos-based color string lexer.
//!
//! Accepted forms:
//!
//! - `#rgb`, `#rrggbb`
//! - `rgb(r, g, b)` with decimal channels 0–255
//! - `ansi(n)` / `color(n)` or a bare integer 0–255 (palette index)
//! - `none`, `default`, `transparent`
//! - any other identifier: a semantic or basic ANSI name, resolved later
//!
//! Anything else is rejected with `None`; callers treat that as "no color".

use logos::Logos;

use super::model::Color;

/// Color token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `#` followed by hex digits. Length is validated by the parser.
    #[regex(r"#[0-9a-fA-F]+")]
    HexColor,

    /// Unsigned decimal integer.
    #[regex(r"[0-9]+")]
    Number,

    /// Names: `accent`, `bright-red`, `rgb`, `none`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,
}

/// Tokenize `input` into `(Token, text)` pairs. Returns `None` if any character fails
/// to lex.
pub fn tokenize(input: &str) -> Option<Vec<(Token, &str)>> {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| result.ok().map(|token| (token, &input[span])))
        .collect()
}

/// Parse a color string. Returns `None` for anything malformed.
pub fn parse_color(input: &str) -> Option<Color> {
    use Token::*;

    let tokens = tokenize(input)?;
    match tokens.as_slice() {
        [(HexColor, hex)] => parse_hex(&hex[1..]),
        [(Number, n)] => n.parse::<u8>().ok().map(Color::Indexed),
        [(Ident, name)] => {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                "none" | "default" | "transparent" => Some(Color::None),
                _ => Some(Color::Named(name)),
            }
        }
        [(Ident, func), (ParenOpen, _), (Number, r), (Comma, _), (Number, g), (Comma, _), (Number, b), (ParenClose, _)]
            if func.eq_ignore_ascii_case("rgb") =>
        {
            Some(Color::Rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?))
        }
        [(Ident, func), (ParenOpen, _), (Number, n), (ParenClose, _)]
            if func.eq_ignore_ascii_case("ansi") || func.eq_ignore_ascii_case("color") =>
        {
            n.parse::<u8>().ok().map(Color::Indexed)
        }
        _ => None,
    }
}

/// Parse a hex color body (without the leading `#`): `rrggbb` or `rgb`.
fn parse_hex(hex: &str) -> Option<Color> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            // Expand: 0xA -> 0xAA
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}
