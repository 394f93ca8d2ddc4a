//! Text measurement by terminal display width.
//!
//! Height calculation and text painting both go through [`wrap`], so the number of
//! rows layout reserves is exactly the number of rows paint writes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `text` in terminal cells.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Split `text` into rows of at most `width` cells.
///
/// Wrapping is per character. A character wider than the remaining space starts a new
/// row; a character wider than `width` itself gets a row of its own. Returns no rows for
/// empty text or zero width.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += w;
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Number of rows `text` occupies at `width` cells.
pub fn text_rows(text: &str, width: usize) -> usize {
    wrap(text, width).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_rows_are_ceil_division() {
        assert_eq!(text_rows("hello", 10), 1);
        assert_eq!(text_rows("hello world", 5), 3);
        assert_eq!(text_rows("abcdef", 3), 2);
    }

    #[test]
    fn empty_or_zero_width() {
        assert_eq!(text_rows("", 10), 0);
        assert_eq!(text_rows("abc", 0), 0);
    }

    #[test]
    fn wrap_splits_at_width() {
        assert_eq!(wrap("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn wide_characters_count_two_cells() {
        assert_eq!(display_width("日本"), 4);
        // Second wide char does not fit in the 1 remaining cell of row one.
        assert_eq!(wrap("a日本", 3), vec!["a日", "本"]);
    }

    #[test]
    fn oversized_character_gets_own_row() {
        assert_eq!(wrap("日x", 1), vec!["日", "x"]);
    }
}
