//! Snapshot rendering helpers.
//!
//! [`commands_to_string`] replays a render command stream onto a blank character grid,
//! the way a terminal would, and returns the visible text. Colors, styles and
//! structural markers are ignored.

use unicode_width::UnicodeWidthChar;

use crate::render::RenderCommand;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rasterize `commands` onto a `width` x `height` grid.
///
/// Each row becomes one line in the output string, with trailing spaces trimmed.
/// Lines are separated by `'\n'`; the final line does not have a trailing newline.
/// Text written outside the grid is clipped.
pub fn commands_to_string(commands: &[RenderCommand], width: u16, height: u16) -> String {
    let mut grid = Grid::new(width, height);
    grid.apply(commands);
    grid.to_string_trimmed()
}

/// Character grid with a cursor. Wide characters occupy their cell plus a
/// continuation cell (`None`) to the right.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Option<char>>>,
    row: usize,
    col: usize,
    saved: (usize, usize),
}

impl Grid {
    /// A blank grid.
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (usize::from(width), usize::from(height));
        Self {
            width,
            height,
            cells: vec![vec![Some(' '); width]; height],
            row: 0,
            col: 0,
            saved: (0, 0),
        }
    }

    /// Replay commands onto the grid.
    pub fn apply(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            match command {
                RenderCommand::MoveCursor { row, col } => {
                    self.row = usize::from(*row);
                    self.col = usize::from(*col);
                }
                RenderCommand::Write(text) => self.write(text),
                RenderCommand::Clear => {
                    for row in &mut self.cells {
                        row.fill(Some(' '));
                    }
                }
                RenderCommand::ClearLine => self.clear_from(0),
                RenderCommand::ClearToEndOfLine => self.clear_from(self.col),
                RenderCommand::SaveCursor => self.saved = (self.row, self.col),
                RenderCommand::RestoreCursor => (self.row, self.col) = self.saved,
                _ => {}
            }
        }
    }

    /// Visible text, one trimmed line per row.
    pub fn to_string_trimmed(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return String::new();
        }
        let lines: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                let s: String = row.iter().flatten().collect();
                s.trim_end().to_owned()
            })
            .collect();
        lines.join("\n")
    }

    fn write(&mut self, text: &str) {
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if self.row < self.height && self.col + w <= self.width {
                let row = &mut self.cells[self.row];
                row[self.col] = Some(ch);
                for cont in 1..w {
                    row[self.col + cont] = None;
                }
            }
            self.col += w;
        }
    }

    fn clear_from(&mut self, col: usize) {
        if let Some(row) = self.cells.get_mut(self.row) {
            for cell in row.iter_mut().skip(col) {
                *cell = Some(' ');
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u16, col: u16, text: &str) -> [RenderCommand; 2] {
        [
            RenderCommand::MoveCursor { row, col },
            RenderCommand::write(text),
        ]
    }

    #[test]
    fn writes_at_cursor() {
        let commands: Vec<RenderCommand> = [at(0, 0, "Row0"), at(1, 3, "Row1")].concat();
        let output = commands_to_string(&commands, 10, 2);
        assert_eq!(output, "Row0\n   Row1");
    }

    #[test]
    fn clips_out_of_bounds() {
        let commands: Vec<RenderCommand> = [at(5, 0, "Ghost"), at(0, 8, "abc")].concat();
        let output = commands_to_string(&commands, 10, 3);
        assert!(!output.contains("Ghost"));
        assert_eq!(output.lines().next(), Some("        ab"));
    }

    #[test]
    fn clear_and_clear_line() {
        let mut commands: Vec<RenderCommand> = [at(0, 0, "hello"), at(1, 0, "world")].concat();
        commands.push(RenderCommand::MoveCursor { row: 0, col: 2 });
        commands.push(RenderCommand::ClearToEndOfLine);
        assert_eq!(commands_to_string(&commands, 10, 2), "he\nworld");

        commands.push(RenderCommand::Clear);
        assert_eq!(commands_to_string(&commands, 10, 2), "\n");
    }

    #[test]
    fn wide_characters_take_two_cells() {
        let commands: Vec<RenderCommand> = [at(0, 0, "日本"), at(1, 0, "abcd")].concat();
        let output = commands_to_string(&commands, 4, 2);
        assert_eq!(output, "日本\nabcd");
    }

    #[test]
    fn markers_and_styles_are_ignored() {
        let commands = vec![
            RenderCommand::SetStyle(crate::render::StyleFlags::BOLD),
            RenderCommand::MoveCursor { row: 0, col: 0 },
            RenderCommand::write("x"),
            RenderCommand::Reset,
            RenderCommand::Flush,
        ];
        assert_eq!(commands_to_string(&commands, 3, 1), "x");
    }

    #[test]
    fn zero_dimensions() {
        assert!(commands_to_string(&[RenderCommand::write("x")], 0, 0).is_empty());
    }
}
