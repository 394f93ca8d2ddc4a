//! Abstract render commands, independent of any output format.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::color::TerminalColor;
use crate::node::{Address, NodeKind};

// ---------------------------------------------------------------------------
// StyleFlags
// ---------------------------------------------------------------------------

/// Text attribute bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleFlags(pub u8);

impl StyleFlags {
    pub const NONE: StyleFlags = StyleFlags(0);
    pub const BOLD: StyleFlags = StyleFlags(1);
    pub const ITALIC: StyleFlags = StyleFlags(2);
    pub const UNDERLINE: StyleFlags = StyleFlags(4);
    pub const DIM: StyleFlags = StyleFlags(8);
    pub const REVERSE: StyleFlags = StyleFlags(16);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: StyleFlags) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no attribute bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for StyleFlags {
    type Output = StyleFlags;
    fn bitor(self, rhs: Self) -> Self::Output {
        StyleFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for StyleFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for StyleFlags {
    type Output = StyleFlags;
    fn bitand(self, rhs: Self) -> Self::Output {
        StyleFlags(self.0 & rhs.0)
    }
}

impl fmt::Display for StyleFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(StyleFlags, &str); 5] = [
            (StyleFlags::BOLD, "bold"),
            (StyleFlags::ITALIC, "italic"),
            (StyleFlags::UNDERLINE, "underline"),
            (StyleFlags::DIM, "dim"),
            (StyleFlags::REVERSE, "reverse"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}

// ---------------------------------------------------------------------------
// RenderCommand
// ---------------------------------------------------------------------------

/// One terminal instruction.
///
/// Rows and columns are zero-based screen cells. `Begin`/`End`/`Frame` are structural
/// markers: terminal sinks ignore them, structured sinks use them to track node extents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderCommand {
    MoveCursor { row: u16, col: u16 },
    Write(String),
    SetForeground(TerminalColor),
    SetBackground(TerminalColor),
    SetStyle(StyleFlags),
    /// Reset colors and attributes.
    Reset,
    Clear,
    ClearLine,
    ClearToEndOfLine,
    SaveCursor,
    RestoreCursor,
    HideCursor,
    ShowCursor,
    Flush,
    Begin {
        address: Address,
        kind: NodeKind,
        parent: Option<Address>,
    },
    End {
        address: Address,
    },
    Frame {
        address: Address,
        payload: String,
    },
}

impl RenderCommand {
    /// Shorthand for [`RenderCommand::MoveCursor`] from signed layout coordinates.
    /// Negative values clamp to 0.
    pub fn move_to(row: i32, col: i32) -> Self {
        RenderCommand::MoveCursor {
            row: clamp_u16(row),
            col: clamp_u16(col),
        }
    }

    /// Shorthand for [`RenderCommand::Write`].
    pub fn write(text: impl Into<String>) -> Self {
        RenderCommand::Write(text.into())
    }

    /// Whether this is a `Begin`/`End`/`Frame` marker.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            RenderCommand::Begin { .. } | RenderCommand::End { .. } | RenderCommand::Frame { .. }
        )
    }
}

/// Concatenated text of every `Write` in `commands`, rows separated by a space.
pub fn commands_text(commands: &[RenderCommand]) -> String {
    let texts: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::Write(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    texts.join(" ")
}

fn clamp_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

impl fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCommand::MoveCursor { row, col } => write!(f, "move {row},{col}"),
            RenderCommand::Write(text) => write!(f, "write {text:?}"),
            RenderCommand::SetForeground(c) => write!(f, "fg {c}"),
            RenderCommand::SetBackground(c) => write!(f, "bg {c}"),
            RenderCommand::SetStyle(s) => write!(f, "style {s}"),
            RenderCommand::Reset => f.write_str("reset"),
            RenderCommand::Clear => f.write_str("clear"),
            RenderCommand::ClearLine => f.write_str("clear-line"),
            RenderCommand::ClearToEndOfLine => f.write_str("clear-eol"),
            RenderCommand::SaveCursor => f.write_str("save-cursor"),
            RenderCommand::RestoreCursor => f.write_str("restore-cursor"),
            RenderCommand::HideCursor => f.write_str("hide-cursor"),
            RenderCommand::ShowCursor => f.write_str("show-cursor"),
            RenderCommand::Flush => f.write_str("flush"),
            RenderCommand::Begin {
                address,
                kind,
                parent,
            } => match parent {
                Some(parent) => write!(f, "begin {address} ({kind}) in {parent}"),
                None => write!(f, "begin {address} ({kind})"),
            },
            RenderCommand::End { address } => write!(f, "end {address}"),
            RenderCommand::Frame { address, payload } => write!(f, "frame {address} {payload:?}"),
        }
    }
}
