//! Well-known property keys shared by layout and paint.

use super::props::{PropKey, Record};

// Geometry (written by layout)
pub const X: PropKey<i64> = PropKey::new("x");
pub const Y: PropKey<i64> = PropKey::new("y");
pub const WIDTH: PropKey<i64> = PropKey::new("width");
pub const HEIGHT: PropKey<i64> = PropKey::new("height");

// Layout hints
pub const SPACING: PropKey<i64> = PropKey::new("spacing");
pub const PADDING: PropKey<i64> = PropKey::new("padding");
/// Preferred row count for leaves whose height is not derived from content.
pub const ROWS: PropKey<i64> = PropKey::new("rows");

// Content
pub const CONTENT: PropKey<String> = PropKey::new("content");
pub const TITLE: PropKey<String> = PropKey::new("title");
pub const LABEL: PropKey<String> = PropKey::new("label");
pub const ICON: PropKey<String> = PropKey::new("icon");
pub const ITEMS: PropKey<Vec<String>> = PropKey::new("items");
pub const ENTRIES: PropKey<Record> = PropKey::new("entries");

// Panel / divider
pub const BORDER: PropKey<bool> = PropKey::new("border");
/// One of `square`, `rounded`, `heavy`, `double`, `ascii`.
pub const BORDER_STYLE: PropKey<String> = PropKey::new("border-style");
pub const RULE: PropKey<String> = PropKey::new("rule");

// Progress
pub const VALUE: PropKey<f64> = PropKey::new("value");
pub const TOTAL: PropKey<f64> = PropKey::new("total");
pub const SHOW_PERCENT: PropKey<bool> = PropKey::new("show-percent");

// Styling
pub const FOREGROUND: PropKey<String> = PropKey::new("fg");
pub const BACKGROUND: PropKey<String> = PropKey::new("bg");
pub const TINT: PropKey<String> = PropKey::new("tint");
pub const INVERT: PropKey<bool> = PropKey::new("invert");
pub const BOLD: PropKey<bool> = PropKey::new("bold");
pub const ITALIC: PropKey<bool> = PropKey::new("italic");
pub const UNDERLINE: PropKey<bool> = PropKey::new("underline");
pub const DIM: PropKey<bool> = PropKey::new("dim");
