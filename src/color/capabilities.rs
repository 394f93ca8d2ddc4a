//! What the output target can display.

/// Color tier an output target supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorSupport {
    NoColor,
    Basic,
    Ansi256,
    TrueColor,
}

/// Output target description, supplied by a capability probe once per session or resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub true_color: bool,
    pub ansi256: bool,
    pub width: u16,
    pub height: u16,
    pub is_tty: bool,
    pub is_ci: bool,
    pub mouse: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::basic()
    }
}

impl Capabilities {
    /// 24-bit color TTY, 80x24.
    pub const fn true_color() -> Self {
        Self {
            true_color: true,
            ansi256: true,
            width: 80,
            height: 24,
            is_tty: true,
            is_ci: false,
            mouse: false,
        }
    }

    /// 256-color TTY, 80x24.
    pub const fn ansi256() -> Self {
        Self {
            true_color: false,
            ..Self::true_color()
        }
    }

    /// 16-color TTY, 80x24.
    pub const fn basic() -> Self {
        Self {
            true_color: false,
            ansi256: false,
            ..Self::true_color()
        }
    }

    /// Not a terminal: no color at all (pipes, files).
    pub const fn none() -> Self {
        Self {
            true_color: false,
            ansi256: false,
            is_tty: false,
            ..Self::true_color()
        }
    }

    /// Set the screen size (builder).
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Mark as running under CI (builder). CI logs render basic ANSI colors even
    /// without a TTY.
    pub const fn with_ci(mut self, is_ci: bool) -> Self {
        self.is_ci = is_ci;
        self
    }

    /// Set mouse support (builder).
    pub const fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    /// The best color tier available.
    pub const fn color_support(&self) -> ColorSupport {
        if self.true_color {
            ColorSupport::TrueColor
        } else if self.ansi256 {
            ColorSupport::Ansi256
        } else if self.is_tty || self.is_ci {
            ColorSupport::Basic
        } else {
            ColorSupport::NoColor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(Capabilities::true_color().color_support(), ColorSupport::TrueColor);
        assert_eq!(Capabilities::ansi256().color_support(), ColorSupport::Ansi256);
        assert_eq!(Capabilities::basic().color_support(), ColorSupport::Basic);
        assert_eq!(Capabilities::none().color_support(), ColorSupport::NoColor);
        assert_eq!(
            Capabilities::none().with_ci(true).color_support(),
            ColorSupport::Basic
        );
    }

    #[test]
    fn with_size() {
        let caps = Capabilities::basic().with_size(120, 40);
        assert_eq!((caps.width, caps.height), (120, 40));
    }
}
