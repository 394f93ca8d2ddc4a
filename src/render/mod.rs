//! Render pipeline output: abstract commands, the paint engine, and output sinks.

pub mod border;
pub mod command;
pub mod paint;
pub mod sink;
pub mod terminal;

pub use border::{BorderChars, BorderStyle};
pub use command::{commands_text, RenderCommand, StyleFlags};
pub use paint::{erase, paint, paint_node, progress_line, PaintContext, SPINNER_FRAMES};
pub use sink::{LogSink, OutputSink, SinkError};
pub use terminal::{detect_capabilities, TerminalSink};
