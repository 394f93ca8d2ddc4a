//! Colors, terminal capabilities, themes and capability fallback.

pub mod capabilities;
pub mod model;
pub mod resolve;
pub mod theme;
pub mod token;

pub use capabilities::{Capabilities, ColorSupport};
pub use model::{Color, TerminalColor};
pub use resolve::{quantize_16, quantize_256, resolve, resolve_str};
pub use theme::Theme;
