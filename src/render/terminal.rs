//! Crossterm terminal output sink.
//!
//! [`TerminalSink`] translates render commands into escape sequences with crossterm's
//! `queue!` and writes them to any `Write`. Structural markers are ignored. Raw mode
//! and the alternate screen are left to the caller.

use std::io::{self, BufWriter, IsTerminal, Stdout, Write};

use async_trait::async_trait;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::color::{Capabilities, TerminalColor};

use super::command::{RenderCommand, StyleFlags};
use super::sink::{OutputSink, SinkError};

// ---------------------------------------------------------------------------
// TerminalSink
// ---------------------------------------------------------------------------

/// Output sink writing ANSI escape sequences.
pub struct TerminalSink<W: Write + Send> {
    writer: W,
    capabilities: Capabilities,
}

impl TerminalSink<BufWriter<Stdout>> {
    /// A sink over buffered stdout with probed capabilities.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()), detect_capabilities())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(writer: W, capabilities: Capabilities) -> Self {
        Self {
            writer,
            capabilities,
        }
    }

    /// Update the advertised capabilities (after a resize).
    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn queue_command(&mut self, command: &RenderCommand) -> io::Result<()> {
        match command {
            RenderCommand::MoveCursor { row, col } => queue!(self.writer, cursor::MoveTo(*col, *row)),
            RenderCommand::Write(text) => queue!(self.writer, Print(text)),
            RenderCommand::SetForeground(color) => {
                queue!(self.writer, SetForegroundColor(to_crossterm(*color)))
            }
            RenderCommand::SetBackground(color) => {
                queue!(self.writer, SetBackgroundColor(to_crossterm(*color)))
            }
            RenderCommand::SetStyle(flags) => self.queue_style(*flags),
            RenderCommand::Reset => queue!(self.writer, SetAttribute(Attribute::Reset), ResetColor),
            RenderCommand::Clear => queue!(self.writer, Clear(ClearType::All)),
            RenderCommand::ClearLine => queue!(self.writer, Clear(ClearType::CurrentLine)),
            RenderCommand::ClearToEndOfLine => queue!(self.writer, Clear(ClearType::UntilNewLine)),
            RenderCommand::SaveCursor => queue!(self.writer, cursor::SavePosition),
            RenderCommand::RestoreCursor => queue!(self.writer, cursor::RestorePosition),
            RenderCommand::HideCursor => queue!(self.writer, cursor::Hide),
            RenderCommand::ShowCursor => queue!(self.writer, cursor::Show),
            RenderCommand::Flush => self.writer.flush(),
            RenderCommand::Begin { .. } | RenderCommand::End { .. } | RenderCommand::Frame { .. } => {
                Ok(())
            }
        }
    }

    fn queue_style(&mut self, flags: StyleFlags) -> io::Result<()> {
        const ATTRIBUTES: [(StyleFlags, Attribute); 5] = [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ];
        for (flag, attribute) in ATTRIBUTES {
            if flags.contains(flag) {
                queue!(self.writer, SetAttribute(attribute))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> OutputSink for TerminalSink<W> {
    async fn apply(&mut self, commands: &[RenderCommand]) -> Result<(), SinkError> {
        for command in commands {
            self.queue_command(command)?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<(), SinkError> {
        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show
        )?;
        self.writer.flush()?;
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

// ---------------------------------------------------------------------------
// Capability probe
// ---------------------------------------------------------------------------

/// Probe stdout: TTY-ness, terminal size, and color depth from `COLORTERM`/`TERM`.
pub fn detect_capabilities() -> Capabilities {
    let is_tty = io::stdout().is_terminal();
    let (width, height) = terminal::size().unwrap_or((80, 24));
    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    let term = std::env::var("TERM").unwrap_or_default();
    let is_ci = std::env::var_os("CI").is_some();
    let no_color = std::env::var_os("NO_COLOR").is_some();

    let base = if no_color || (!is_tty && !is_ci) {
        Capabilities::none()
    } else if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        Capabilities::true_color()
    } else if term.contains("256color") {
        Capabilities::ansi256()
    } else {
        Capabilities::basic()
    };
    Capabilities {
        is_tty,
        ..base.with_size(width, height).with_ci(is_ci)
    }
}

/// Map a resolved color to crossterm. Basic indices use the named colors so they
/// follow the terminal's own palette.
fn to_crossterm(color: TerminalColor) -> Color {
    match color {
        TerminalColor::Rgb { r, g, b } => Color::Rgb { r, g, b },
        TerminalColor::Ansi256(i) => Color::AnsiValue(i),
        TerminalColor::Ansi16(i) => match i {
            0 => Color::Black,
            1 => Color::DarkRed,
            2 => Color::DarkGreen,
            3 => Color::DarkYellow,
            4 => Color::DarkBlue,
            5 => Color::DarkMagenta,
            6 => Color::DarkCyan,
            7 => Color::Grey,
            8 => Color::DarkGrey,
            9 => Color::Red,
            10 => Color::Green,
            11 => Color::Yellow,
            12 => Color::Blue,
            13 => Color::Magenta,
            14 => Color::Cyan,
            15 => Color::White,
            other => Color::AnsiValue(other),
        },
    }
}

// ===========================================================================
// Tests
// ===========================================================================
