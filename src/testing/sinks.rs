//! Output sinks for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::color::Capabilities;
use crate::render::{OutputSink, RenderCommand, SinkError};

use super::snapshot::Grid;

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Records every batch it receives. Clones share the same log, so keep a clone
/// before handing the sink to a runtime.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    batches: Arc<Mutex<Vec<Vec<RenderCommand>>>>,
    resets: Arc<AtomicUsize>,
    capabilities: Capabilities,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new(Capabilities::true_color())
    }
}

impl RecordingSink {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            batches: Arc::default(),
            resets: Arc::default(),
            capabilities,
        }
    }

    /// Every batch received so far.
    pub fn batches(&self) -> Vec<Vec<RenderCommand>> {
        self.lock().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.lock().len()
    }

    /// The most recent batch.
    pub fn last_batch(&self) -> Option<Vec<RenderCommand>> {
        self.lock().last().cloned()
    }

    /// All received commands, flattened in order.
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.lock().iter().flatten().cloned().collect()
    }

    /// Number of `reset` calls.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Acquire)
    }

    /// Replay everything received onto a screen of the recorded capabilities' size.
    pub fn screen(&self) -> String {
        let mut grid = Grid::new(self.capabilities.width, self.capabilities.height);
        for batch in self.lock().iter() {
            grid.apply(batch);
        }
        grid.to_string_trimmed()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<RenderCommand>>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OutputSink for RecordingSink {
    async fn apply(&mut self, commands: &[RenderCommand]) -> Result<(), SinkError> {
        self.lock().push(commands.to_vec());
        Ok(())
    }

    async fn reset(&mut self) -> Result<(), SinkError> {
        self.resets.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ---------------------------------------------------------------------------
// FailingSink
// ---------------------------------------------------------------------------

/// Fails every `apply`. Clones share the attempt counter.
#[derive(Debug, Clone, Default)]
pub struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `apply` calls so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }
}

#[async_trait]
impl OutputSink for FailingSink {
    async fn apply(&mut self, _commands: &[RenderCommand]) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::AcqRel);
        Err(SinkError::Other("injected failure".into()))
    }

    async fn reset(&mut self) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_clones_share_log() {
        let recorder = RecordingSink::new(Capabilities::none().with_size(5, 1));
        let mut sink = recorder.clone();
        tokio_test::block_on(async {
            sink.apply(&[RenderCommand::move_to(0, 1), RenderCommand::write("hi")])
                .await
                .unwrap();
            sink.reset().await.unwrap();
        });
        assert_eq!(recorder.batch_count(), 1);
        assert_eq!(recorder.commands().len(), 2);
        assert_eq!(recorder.resets(), 1);
        assert_eq!(recorder.screen(), " hi");
    }

    #[test]
    fn failing_sink_counts_attempts() {
        let counter = FailingSink::new();
        let mut sink = counter.clone();
        let result = tokio_test::block_on(sink.apply(&[RenderCommand::Flush]));
        assert!(matches!(result, Err(SinkError::Other(_))));
        assert_eq!(counter.attempts(), 1);
    }
}
