//! The single coordinating worker.
//!
//! All runtime state lives here and is touched only by the worker task, one request at
//! a time. Handles talk to it through an mpsc queue and get answers on oneshot
//! channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use slotmap::{new_key_type, SlotMap};
use tokio::sync::{mpsc, oneshot};

use crate::color::Capabilities;
use crate::node::{Address, Node};
use crate::render::{OutputSink, RenderCommand};

use super::animation::{frame_interval, spawn_animation, AnimationHandle, AnimationUpdate};
use super::commit::{prepare_commit, CommitReport, Committed};
use super::options::SessionOptions;

new_key_type! {
    /// Key of a registered output sink.
    pub struct SinkId;
}

/// A unit of work for the worker.
pub(crate) enum Request {
    Commit {
        tree: Node,
        options: SessionOptions,
        reply: oneshot::Sender<CommitReport>,
    },
    Apply {
        commands: Vec<RenderCommand>,
        reply: oneshot::Sender<usize>,
    },
    AnimationFrame {
        commands: Vec<RenderCommand>,
        cancelled: Arc<AtomicBool>,
    },
    AddSink {
        sink: Box<dyn OutputSink>,
        reply: oneshot::Sender<SinkId>,
    },
    RemoveSink {
        id: SinkId,
        reply: oneshot::Sender<bool>,
    },
    SinkCapabilities {
        id: SinkId,
        reply: oneshot::Sender<Option<Capabilities>>,
    },
    SetCapabilities {
        capabilities: Capabilities,
        reply: oneshot::Sender<()>,
    },
    Capabilities {
        reply: oneshot::Sender<Capabilities>,
    },
    StartAnimation {
        address: Address,
        duration: Duration,
        fps: u32,
        update: AnimationUpdate,
        reply: oneshot::Sender<()>,
    },
    StopAnimation {
        address: Address,
        reply: oneshot::Sender<bool>,
    },
    StopAllAnimations {
        reply: oneshot::Sender<usize>,
    },
    ActiveAnimations {
        reply: oneshot::Sender<usize>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Worker-owned session state.
pub(crate) struct Worker {
    requests: mpsc::Receiver<Request>,
    /// For animation tasks; weak so dropping every handle still ends the worker.
    frames: mpsc::WeakSender<Request>,
    sinks: SlotMap<SinkId, Box<dyn OutputSink>>,
    previous: Option<Committed>,
    options: SessionOptions,
    capabilities: Capabilities,
    force_full: bool,
    animations: HashMap<Address, AnimationHandle>,
}

impl Worker {
    pub(crate) fn new(
        requests: mpsc::Receiver<Request>,
        frames: mpsc::WeakSender<Request>,
        capabilities: Capabilities,
        options: SessionOptions,
    ) -> Self {
        Self {
            requests,
            frames,
            sinks: SlotMap::with_key(),
            previous: None,
            options,
            capabilities,
            force_full: false,
            animations: HashMap::new(),
        }
    }

    /// Process requests until shutdown or until every handle is dropped.
    pub(crate) async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            match request {
                Request::Commit {
                    tree,
                    options,
                    reply,
                } => {
                    let report = self.commit(tree, options).await;
                    let _ = reply.send(report);
                }
                Request::Apply { commands, reply } => {
                    let failed = self.dispatch(&with_flush(commands)).await;
                    let _ = reply.send(failed);
                }
                Request::AnimationFrame {
                    commands,
                    cancelled,
                } => {
                    if !cancelled.load(Ordering::Acquire) {
                        self.dispatch(&with_flush(commands)).await;
                    }
                }
                Request::AddSink { sink, reply } => {
                    let name = sink.name().to_owned();
                    let advertised = sink.capabilities();
                    let id = self.sinks.insert(sink);
                    if advertised != self.capabilities {
                        tracing::debug!(
                            sink = %name,
                            ?id,
                            sink_support = ?advertised.color_support(),
                            session_support = ?self.capabilities.color_support(),
                            "sink capabilities differ from the session's"
                        );
                    }
                    tracing::debug!(sink = %name, ?id, "sink added");
                    let _ = reply.send(id);
                }
                Request::RemoveSink { id, reply } => {
                    let _ = reply.send(self.sinks.remove(id).is_some());
                }
                Request::SinkCapabilities { id, reply } => {
                    let _ = reply.send(self.sinks.get(id).map(|sink| sink.capabilities()));
                }
                Request::SetCapabilities {
                    capabilities,
                    reply,
                } => {
                    if capabilities != self.capabilities {
                        self.capabilities = capabilities;
                        self.force_full = true;
                    }
                    let _ = reply.send(());
                }
                Request::Capabilities { reply } => {
                    let _ = reply.send(self.capabilities);
                }
                Request::StartAnimation {
                    address,
                    duration,
                    fps,
                    update,
                    reply,
                } => {
                    self.start_animation(address, duration, fps, update);
                    let _ = reply.send(());
                }
                Request::StopAnimation { address, reply } => {
                    let stopped = match self.animations.remove(&address) {
                        Some(handle) => {
                            handle.cancel();
                            true
                        }
                        None => false,
                    };
                    let _ = reply.send(stopped);
                }
                Request::StopAllAnimations { reply } => {
                    let _ = reply.send(self.stop_all_animations());
                }
                Request::ActiveAnimations { reply } => {
                    self.prune_animations();
                    let _ = reply.send(self.animations.len());
                }
                Request::Shutdown { reply } => {
                    self.shutdown().await;
                    let _ = reply.send(());
                    return;
                }
            }
        }
        self.shutdown().await;
    }

    async fn commit(&mut self, tree: Node, options: SessionOptions) -> CommitReport {
        if options.debug {
            if let Err(err) = tree.validate() {
                tracing::warn!(error = %err, "committed tree failed validation");
            }
        }
        if options.theme != self.options.theme {
            self.force_full = true;
        }
        self.options = options;

        let prepared = prepare_commit(
            self.previous.as_ref(),
            tree,
            &self.capabilities,
            &self.options,
            self.force_full,
        );
        self.force_full = false;

        if self.options.debug {
            for command in &prepared.commands {
                tracing::debug!(%command, "render command");
            }
        }

        let failed_sinks = self.dispatch(&prepared.commands).await;
        self.previous = Some(prepared.committed);

        let report = CommitReport {
            failed_sinks,
            ..prepared.report
        };
        tracing::debug!(
            mode = %report.mode,
            insertions = report.insertions,
            updates = report.updates,
            deletions = report.deletions,
            moves = report.moves,
            relocations = report.relocations,
            commands = report.commands,
            failed_sinks = report.failed_sinks,
            "commit"
        );
        report
    }

    /// Send `commands` to every sink concurrently. Returns how many failed.
    async fn dispatch(&mut self, commands: &[RenderCommand]) -> usize {
        let results = join_all(self.sinks.iter_mut().map(|(id, sink)| async move {
            let name = sink.name().to_owned();
            (id, name, sink.apply(commands).await)
        }))
        .await;

        let mut failed = 0;
        for (id, name, result) in results {
            if let Err(err) = result {
                failed += 1;
                tracing::warn!(sink = %name, ?id, error = %err, "output sink failed");
            }
        }
        failed
    }

    fn start_animation(&mut self, address: Address, duration: Duration, fps: u32, update: AnimationUpdate) {
        if let Some(previous) = self.animations.remove(&address) {
            previous.cancel();
            tracing::debug!(%address, "animation replaced");
        }
        self.prune_animations();
        let interval = frame_interval(fps, self.options.fps());
        let handle = spawn_animation(address.clone(), duration, interval, update, self.frames.clone());
        self.animations.insert(address, handle);
    }

    fn stop_all_animations(&mut self) -> usize {
        self.prune_animations();
        let count = self.animations.len();
        for (_, handle) in self.animations.drain() {
            handle.cancel();
        }
        count
    }

    fn prune_animations(&mut self) {
        self.animations.retain(|_, handle| !handle.is_finished());
    }

    async fn shutdown(&mut self) {
        let stopped = self.stop_all_animations();
        let resets = join_all(self.sinks.iter_mut().map(|(_, sink)| sink.reset())).await;
        for err in resets.into_iter().filter_map(Result::err) {
            tracing::warn!(error = %err, "output sink reset failed");
        }
        tracing::debug!(animations = stopped, sinks = self.sinks.len(), "runtime shut down");
    }
}

/// Terminate a batch with `Flush` unless it already ends with one.
fn with_flush(mut commands: Vec<RenderCommand>) -> Vec<RenderCommand> {
    if commands.last() != Some(&RenderCommand::Flush) {
        commands.push(RenderCommand::Flush);
    }
    commands
}
