//! Available space passed top-down through the layout pass.

use crate::color::Capabilities;
use crate::geometry::Region;

/// Space a node may occupy: size plus the screen position of its top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutContext {
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
}

impl LayoutContext {
    /// A context of the given size at the screen origin.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// The whole screen described by `caps`.
    pub fn viewport(caps: &Capabilities) -> Self {
        Self::new(i32::from(caps.width), i32::from(caps.height))
    }

    /// Move the origin (builder).
    pub const fn at(mut self, origin_x: i32, origin_y: i32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// The context as a region.
    pub const fn region(self) -> Region {
        Region::new(self.origin_x, self.origin_y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uses_capability_size() {
        let caps = Capabilities::true_color().with_size(100, 30);
        assert_eq!(LayoutContext::viewport(&caps), LayoutContext::new(100, 30));
    }

    #[test]
    fn at_moves_origin() {
        let ctx = LayoutContext::new(10, 2).at(3, 4);
        assert_eq!(ctx.region(), Region::new(3, 4, 10, 2));
    }
}
