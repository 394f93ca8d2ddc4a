//! Node kinds and their categories.

use std::fmt;

/// Broad grouping of node kinds. Layout and paint rules dispatch on the kind, the
/// category is for callers that only care about the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Layout,
    Text,
    Data,
    Progress,
    Input,
    Visual,
    Effect,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Layout
    VStack,
    HStack,
    Panel,
    Divider,
    Spacer,
    Group,
    Empty,
    Grid,
    KeyValue,

    // Text
    Text,
    Code,
    Badge,
    Tag,
    Note,
    List,

    // Data
    Table,
    Tree,

    // Progress
    ProgressBar,
    Spinner,
    Meter,
    Gauge,

    // Input
    TextField,
    TextArea,

    // Visual
    Image,
    Sparkline,

    // Effect markers
    Shimmer,
    Blink,
    Pulse,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 28] = [
        NodeKind::VStack,
        NodeKind::HStack,
        NodeKind::Panel,
        NodeKind::Divider,
        NodeKind::Spacer,
        NodeKind::Group,
        NodeKind::Empty,
        NodeKind::Grid,
        NodeKind::KeyValue,
        NodeKind::Text,
        NodeKind::Code,
        NodeKind::Badge,
        NodeKind::Tag,
        NodeKind::Note,
        NodeKind::List,
        NodeKind::Table,
        NodeKind::Tree,
        NodeKind::ProgressBar,
        NodeKind::Spinner,
        NodeKind::Meter,
        NodeKind::Gauge,
        NodeKind::TextField,
        NodeKind::TextArea,
        NodeKind::Image,
        NodeKind::Sparkline,
        NodeKind::Shimmer,
        NodeKind::Blink,
        NodeKind::Pulse,
    ];

    /// Stable tag used in addresses and `Begin` markers.
    pub const fn tag(self) -> &'static str {
        match self {
            NodeKind::VStack => "vstack",
            NodeKind::HStack => "hstack",
            NodeKind::Panel => "panel",
            NodeKind::Divider => "divider",
            NodeKind::Spacer => "spacer",
            NodeKind::Group => "group",
            NodeKind::Empty => "empty",
            NodeKind::Grid => "grid",
            NodeKind::KeyValue => "key-value",
            NodeKind::Text => "text",
            NodeKind::Code => "code",
            NodeKind::Badge => "badge",
            NodeKind::Tag => "tag",
            NodeKind::Note => "note",
            NodeKind::List => "list",
            NodeKind::Table => "table",
            NodeKind::Tree => "tree",
            NodeKind::ProgressBar => "progress-bar",
            NodeKind::Spinner => "spinner",
            NodeKind::Meter => "meter",
            NodeKind::Gauge => "gauge",
            NodeKind::TextField => "text-field",
            NodeKind::TextArea => "text-area",
            NodeKind::Image => "image",
            NodeKind::Sparkline => "sparkline",
            NodeKind::Shimmer => "shimmer",
            NodeKind::Blink => "blink",
            NodeKind::Pulse => "pulse",
        }
    }

    /// Look a kind up by its tag.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// The family this kind belongs to.
    pub const fn category(self) -> NodeCategory {
        match self {
            NodeKind::VStack
            | NodeKind::HStack
            | NodeKind::Panel
            | NodeKind::Divider
            | NodeKind::Spacer
            | NodeKind::Group
            | NodeKind::Empty
            | NodeKind::Grid
            | NodeKind::KeyValue => NodeCategory::Layout,
            NodeKind::Text
            | NodeKind::Code
            | NodeKind::Badge
            | NodeKind::Tag
            | NodeKind::Note
            | NodeKind::List => NodeCategory::Text,
            NodeKind::Table | NodeKind::Tree => NodeCategory::Data,
            NodeKind::ProgressBar | NodeKind::Spinner | NodeKind::Meter | NodeKind::Gauge => {
                NodeCategory::Progress
            }
            NodeKind::TextField | NodeKind::TextArea => NodeCategory::Input,
            NodeKind::Image | NodeKind::Sparkline => NodeCategory::Visual,
            NodeKind::Shimmer | NodeKind::Blink | NodeKind::Pulse => NodeCategory::Effect,
        }
    }

    /// Kinds that always occupy exactly one row.
    pub const fn is_single_row(self) -> bool {
        matches!(
            self,
            NodeKind::Divider
                | NodeKind::Badge
                | NodeKind::Tag
                | NodeKind::Note
                | NodeKind::ProgressBar
                | NodeKind::Spinner
                | NodeKind::Meter
                | NodeKind::Gauge
                | NodeKind::TextField
                | NodeKind::Sparkline
        )
    }

    /// Vertical or horizontal stack.
    pub const fn is_stack(self) -> bool {
        matches!(self, NodeKind::VStack | NodeKind::HStack)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
