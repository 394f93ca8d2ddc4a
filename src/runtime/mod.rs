//! Session runtime: the single worker that owns the previous tree, the sinks and the
//! animation loops, and drives commit cycles.

pub mod animation;
pub mod commit;
pub mod handle;
pub mod options;
pub(crate) mod worker;

pub use animation::{frame_interval, progress, AnimationUpdate};
pub use commit::{prepare_commit, CommitMode, CommitReport, Committed, PreparedCommit};
pub use handle::{Runtime, RuntimeError};
pub use options::{SessionOptions, DEFAULT_FPS, MAX_FPS};
pub use worker::SinkId;
