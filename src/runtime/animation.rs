//! Per-address animation loops.
//!
//! Each animation is an independent tokio task that calls an update closure with a
//! progress value in `0.0..=1.0` and forwards the returned commands to the worker.
//! Cancellation is cooperative (an atomic flag checked every tick) and backed by
//! aborting the task, so a cancelled animation never gets its final `update(1.0)`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::node::Address;
use crate::render::RenderCommand;

use super::worker::Request;

/// Animation step: receives progress, returns the commands to draw for it.
pub type AnimationUpdate = Box<dyn FnMut(f64) -> Vec<RenderCommand> + Send + 'static>;

/// A running animation.
#[derive(Debug)]
pub(crate) struct AnimationHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// Stop the animation. Frames already queued are dropped by the worker.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Tick interval for an animation asking for `fps`, capped by the session rate.
pub fn frame_interval(fps: u32, session_fps: u32) -> Duration {
    let fps = fps.min(session_fps).max(1);
    Duration::from_nanos(1_000_000_000 / u64::from(fps))
}

/// Progress after `elapsed` of `duration`, clamped to 1.0. Zero duration is complete.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Spawn the loop for `address`. Frames are sent as [`Request::AnimationFrame`].
pub(crate) fn spawn_animation(
    address: Address,
    duration: Duration,
    interval: Duration,
    mut update: AnimationUpdate,
    requests: WeakSender<Request>,
) -> AnimationHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    let task = tokio::spawn(async move {
        tracing::debug!(%address, ?duration, ?interval, "animation started");
        let start = Instant::now();
        loop {
            if flag.load(Ordering::Acquire) {
                return;
            }
            let progress = progress(start.elapsed(), duration);
            if progress >= 1.0 {
                break;
            }
            tracing::trace!(%address, progress, "animation tick");
            if !send_frame(&requests, update(progress), &flag).await {
                return;
            }
            tokio::time::sleep(interval).await;
        }
        if !flag.load(Ordering::Acquire) {
            send_frame(&requests, update(1.0), &flag).await;
            tracing::debug!(%address, "animation finished");
        }
    });

    AnimationHandle { cancelled, task }
}

/// Forward one frame. Returns false once the worker is gone.
async fn send_frame(
    requests: &WeakSender<Request>,
    commands: Vec<RenderCommand>,
    cancelled: &Arc<AtomicBool>,
) -> bool {
    let Some(sender) = requests.upgrade() else {
        return false;
    };
    if commands.is_empty() {
        return true;
    }
    sender
        .send(Request::AnimationFrame {
            commands,
            cancelled: Arc::clone(cancelled),
        })
        .await
        .is_ok()
}
