//! Public handle to the runtime worker.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::color::Capabilities;
use crate::node::{Address, Node};
use crate::render::{OutputSink, RenderCommand};

use super::animation::AnimationUpdate;
use super::commit::CommitReport;
use super::options::SessionOptions;
use super::worker::{Request, SinkId, Worker};

/// Capacity of the request queue.
const QUEUE_DEPTH: usize = 64;

/// Errors surfaced by the runtime handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The worker task has shut down.
    #[error("runtime worker is no longer running")]
    WorkerClosed,
}

impl<T> From<mpsc::error::SendError<T>> for RuntimeError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        RuntimeError::WorkerClosed
    }
}

impl From<oneshot::error::RecvError> for RuntimeError {
    fn from(_: oneshot::error::RecvError) -> Self {
        RuntimeError::WorkerClosed
    }
}

/// Cloneable handle to a running session.
///
/// Every method is a request to the worker task; requests from all handles are
/// processed one at a time in arrival order. The worker stops on [`Runtime::shutdown`]
/// or once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct Runtime {
    requests: mpsc::Sender<Request>,
}

impl Runtime {
    /// Spawn a worker with default session options. Must be called inside a tokio
    /// runtime.
    pub fn spawn(capabilities: Capabilities) -> Self {
        Self::spawn_with(capabilities, SessionOptions::default())
    }

    /// Spawn a worker with the given initial session options.
    pub fn spawn_with(capabilities: Capabilities, options: SessionOptions) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let worker = Worker::new(rx, tx.downgrade(), capabilities, options);
        tokio::spawn(worker.run());
        Self { requests: tx }
    }

    /// Reconcile, lay out, paint, and dispatch `tree`. Resolves once every sink has
    /// finished with the batch.
    pub async fn commit(&self, tree: Node, options: SessionOptions) -> Result<CommitReport, RuntimeError> {
        self.request(|reply| Request::Commit {
            tree,
            options,
            reply,
        })
        .await
    }

    /// Send raw commands to every sink. Returns the number of sinks that failed.
    pub async fn apply(&self, commands: Vec<RenderCommand>) -> Result<usize, RuntimeError> {
        self.request(|reply| Request::Apply { commands, reply }).await
    }

    /// Register an output sink.
    pub async fn add_sink(&self, sink: impl OutputSink + 'static) -> Result<SinkId, RuntimeError> {
        self.add_boxed_sink(Box::new(sink)).await
    }

    /// Register an already boxed output sink.
    pub async fn add_boxed_sink(&self, sink: Box<dyn OutputSink>) -> Result<SinkId, RuntimeError> {
        self.request(|reply| Request::AddSink { sink, reply }).await
    }

    /// Unregister a sink. Returns whether it was registered.
    pub async fn remove_sink(&self, id: SinkId) -> Result<bool, RuntimeError> {
        self.request(|reply| Request::RemoveSink { id, reply }).await
    }

    /// The capabilities a registered sink advertises, or `None` if `id` is unknown.
    /// The session does not adopt them; pass them to
    /// [`set_capabilities`](Runtime::set_capabilities) to do so.
    pub async fn sink_capabilities(&self, id: SinkId) -> Result<Option<Capabilities>, RuntimeError> {
        self.request(|reply| Request::SinkCapabilities { id, reply }).await
    }

    /// Replace the capabilities (after a resize). A change makes the next commit a
    /// full repaint.
    pub async fn set_capabilities(&self, capabilities: Capabilities) -> Result<(), RuntimeError> {
        self.request(|reply| Request::SetCapabilities {
            capabilities,
            reply,
        })
        .await
    }

    /// The capabilities the session lays out and resolves colors for.
    pub async fn capabilities(&self) -> Result<Capabilities, RuntimeError> {
        self.request(|reply| Request::Capabilities { reply }).await
    }

    /// Run `update` for `address` over `duration` at up to `fps` frames per second
    /// (capped by the session rate). Replaces any animation already running there.
    pub async fn start_animation<F>(
        &self,
        address: Address,
        duration: Duration,
        fps: u32,
        update: F,
    ) -> Result<(), RuntimeError>
    where
        F: FnMut(f64) -> Vec<RenderCommand> + Send + 'static,
    {
        let update: AnimationUpdate = Box::new(update);
        self.request(|reply| Request::StartAnimation {
            address,
            duration,
            fps,
            update,
            reply,
        })
        .await
    }

    /// Cancel the animation at `address`. Returns whether one was running.
    pub async fn stop_animation(&self, address: Address) -> Result<bool, RuntimeError> {
        self.request(|reply| Request::StopAnimation { address, reply }).await
    }

    /// Cancel every animation. Returns how many were running.
    pub async fn stop_all_animations(&self) -> Result<usize, RuntimeError> {
        self.request(|reply| Request::StopAllAnimations { reply }).await
    }

    /// Number of animations still running.
    pub async fn active_animations(&self) -> Result<usize, RuntimeError> {
        self.request(|reply| Request::ActiveAnimations { reply }).await
    }

    /// Cancel all animations, reset every sink, and stop the worker.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|reply| Request::Shutdown { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.requests.send(build(tx)).await?;
        Ok(rx.await?)
    }
}
