//! Per-commit session options.

use crate::color::Theme;

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 15;

/// Upper bound for any frame rate, session or animation.
pub const MAX_FPS: u32 = 120;

/// Options passed with each commit. The most recent commit's options are the
/// session's options (animation pacing uses them too).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Frame rate cap for live updates and animations. Always in `1..=MAX_FPS`.
    pub live_fps: u32,
    /// Semantic color names used by paint.
    pub theme: Theme,
    /// Validate committed trees and log every emitted command.
    pub debug: bool,
    /// Output goes to non-terminal sinks: skip screen clears and cursor visibility.
    pub headless: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            live_fps: DEFAULT_FPS,
            theme: Theme::default(),
            debug: false,
            headless: false,
        }
    }
}

impl SessionOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live frame rate (builder). Clamped to `1..=MAX_FPS`.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.live_fps = fps.clamp(1, MAX_FPS);
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set debug mode (builder).
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set headless mode (builder).
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// The live frame rate, clamped even if the field was set directly.
    pub fn fps(&self) -> u32 {
        self.live_fps.clamp(1, MAX_FPS)
    }
}
