//! Layout engine: rule-based geometry assignment written back into node properties.

pub mod context;
pub mod engine;
pub mod measure;

pub use context::LayoutContext;
pub use engine::{calculate_height, layout};
