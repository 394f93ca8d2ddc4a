//! Screen rectangles in terminal cells.
//!
//! Layout writes geometry into node properties as plain integers; [`Region`] is the
//! typed view of those four numbers used by layout and paint.

use crate::node::{keys, Node, PropKey};

/// A rectangle in terminal cells. `x`/`y` are the top-left corner (column/row).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// A zero-sized region at the origin.
    pub const EMPTY: Region = Region {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Read the laid-out geometry of `node`. Missing values read as zero.
    pub fn of(node: &Node) -> Region {
        let get = |key: PropKey<i64>| {
            node.prop(key)
                .unwrap_or(0)
                .clamp(i32::MIN as i64, i32::MAX as i64) as i32
        };
        Region {
            x: get(keys::X),
            y: get(keys::Y),
            width: get(keys::WIDTH),
            height: get(keys::HEIGHT),
        }
    }

    /// Shrink by `amount` cells on every side. Width and height never go negative.
    pub fn inset(self, amount: i32) -> Region {
        Region {
            x: self.x.saturating_add(amount),
            y: self.y.saturating_add(amount),
            width: self.width.saturating_sub(amount.saturating_mul(2)).max(0),
            height: self.height.saturating_sub(amount.saturating_mul(2)).max(0),
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the region covers no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The part of `self` a terminal can address: columns and rows in `0..=u16::MAX`.
    pub fn addressable(self) -> Region {
        let limit = i32::from(u16::MAX) + 1;
        let x = self.x.clamp(0, limit);
        let y = self.y.clamp(0, limit);
        Region {
            x,
            y,
            width: (self.right().min(limit) - x).max(0),
            height: (self.bottom().min(limit) - y).max(0),
        }
    }

    /// Whether the cell at (`x`, `y`) is inside.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_region(self, other: Region) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }
}
