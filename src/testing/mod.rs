//! Headless testing helpers: command rasterizer and recording sinks.
//!
//! Use [`commands_to_string`] to turn a render command stream into plain text for
//! snapshot-style assertions, and [`RecordingSink`] / [`FailingSink`] to observe what a
//! [`Runtime`](crate::runtime::Runtime) dispatches.

pub mod sinks;
pub mod snapshot;

pub use sinks::{FailingSink, RecordingSink};
pub use snapshot::{commands_to_string, Grid};
