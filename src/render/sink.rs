//! Output sinks: the consumers of render command batches.

use async_trait::async_trait;

use crate::color::Capabilities;

use super::command::{commands_text, RenderCommand};

/// Errors an output sink can report. The runtime logs and counts them; they never
/// reach the committer.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// A destination for render commands (terminal, log, test recorder).
///
/// Sinks are owned by the runtime worker and driven one batch at a time. A batch
/// produced by a commit already ends with [`RenderCommand::Flush`]; `flush` exists for
/// callers driving a sink directly.
#[async_trait]
pub trait OutputSink: Send {
    /// Apply one batch of commands, in order.
    async fn apply(&mut self, commands: &[RenderCommand]) -> Result<(), SinkError>;

    /// Push buffered output to the device.
    async fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Return the device to its default state (colors, attributes, cursor).
    async fn reset(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// What this sink can display.
    ///
    /// Advisory: a session lays out and resolves colors for the capabilities it was
    /// spawned with (or last given), and only logs when a sink reports different ones.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Short name used in log events.
    fn name(&self) -> &str {
        "sink"
    }
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Emits each batch as a `tracing` event instead of drawing it.
///
/// Useful for headless sessions and CI logs: the event carries the batch size and
/// the concatenated text written by the batch.
#[derive(Debug, Default)]
pub struct LogSink {
    batches: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches applied so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

#[async_trait]
impl OutputSink for LogSink {
    async fn apply(&mut self, commands: &[RenderCommand]) -> Result<(), SinkError> {
        self.batches += 1;
        let markers = commands.iter().filter(|c| c.is_marker()).count();
        tracing::info!(
            target: "strata_tui::sink",
            batch = self.batches,
            commands = commands.len(),
            markers,
            text = %commands_text(commands),
            "render batch"
        );
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    fn name(&self) -> &str {
        "log"
    }
}
