//! Rule-based layout pass.
//!
//! [`layout`] walks a node tree top-down with a [`LayoutContext`] and returns a new tree
//! whose nodes carry `x`, `y`, `width` and `height` properties. Heights of children are
//! known before they are placed, via the [`calculate_height`] pre-pass.
//!
//! Rules by kind:
//!
//! | kind                | children                                   | own height                          |
//! |---------------------|--------------------------------------------|-------------------------------------|
//! | vstack              | stacked top to bottom, width − 2·padding   | Σ heights + spacing·(n−1) + 2·pad   |
//! | hstack              | equal floor-divided widths, side by side   | tallest child + 2·padding           |
//! | panel               | stacked inside border + padding            | 2 (if bordered) + 2·pad + Σ heights |
//! | single-row kinds    | inherit                                    | 1                                   |
//! | everything else     | inherit the parent's context unchanged     | [`calculate_height`]                |

use crate::geometry::Region;
use crate::node::{keys, Node, NodeKind};

use super::context::LayoutContext;
use super::measure::text_rows;

/// Lay out `node` (and its subtree) inside `ctx`.
pub fn layout(node: &Node, ctx: LayoutContext) -> Node {
    match node.kind() {
        NodeKind::VStack => layout_vstack(node, ctx),
        NodeKind::HStack => layout_hstack(node, ctx),
        NodeKind::Panel => layout_panel(node, ctx),
        kind if kind.is_single_row() => {
            let children = inherit(node, ctx);
            finish(node, Region::new(ctx.origin_x, ctx.origin_y, ctx.width, 1), children)
        }
        _ => {
            let height = calculate_height(node, ctx.width);
            let children = inherit(node, ctx);
            finish(node, Region::new(ctx.origin_x, ctx.origin_y, ctx.width, height), children)
        }
    }
}

/// Rows `node` needs when given `width` columns.
pub fn calculate_height(node: &Node, width: i32) -> i32 {
    let kind = node.kind();
    if kind.is_single_row() {
        return 1;
    }
    match kind {
        NodeKind::VStack => {
            let padding = padding(node);
            let inner = shrink(width, padding);
            stacked_height(node.children(), inner, spacing(node)).saturating_add(twice(padding))
        }
        NodeKind::HStack => {
            let padding = padding(node);
            let child_width = hstack_child_width(node, width);
            tallest(node.children(), child_width).saturating_add(twice(padding))
        }
        NodeKind::Panel => {
            let inset = panel_inset(node);
            let inner = shrink(width, inset);
            stacked_height(node.children(), inner, spacing(node)).saturating_add(twice(inset))
        }
        NodeKind::Text => {
            let content = node.prop_str(keys::CONTENT).unwrap_or("");
            to_i32(text_rows(content, width.max(0) as usize))
        }
        NodeKind::Code => {
            let content = node.prop_str(keys::CONTENT).unwrap_or("");
            to_i32(content.lines().count())
        }
        NodeKind::List | NodeKind::Tree | NodeKind::Table => node
            .properties()
            .get_ref(keys::ITEMS)
            .map_or(0, |items| to_i32(items.len())),
        NodeKind::KeyValue => node
            .properties()
            .get_ref(keys::ENTRIES)
            .map_or(0, |entries| to_i32(entries.len())),
        NodeKind::Empty => 0,
        NodeKind::Spacer => rows_hint(node).unwrap_or(1),
        _ => rows_hint(node).unwrap_or_else(|| {
            if node.children().is_empty() {
                1
            } else {
                tallest(node.children(), width)
            }
        }),
    }
}

// ---------------------------------------------------------------------------
// Per-kind rules
// ---------------------------------------------------------------------------

fn layout_vstack(node: &Node, ctx: LayoutContext) -> Node {
    let padding = padding(node);
    let spacing = spacing(node);
    let inner_width = shrink(ctx.width, padding);
    let children = stack_children(
        node.children(),
        inner_width,
        spacing,
        ctx.origin_x.saturating_add(padding),
        ctx.origin_y.saturating_add(padding),
    );
    let height = stacked_height(node.children(), inner_width, spacing).saturating_add(twice(padding));
    finish(node, Region::new(ctx.origin_x, ctx.origin_y, ctx.width, height), children)
}

fn layout_hstack(node: &Node, ctx: LayoutContext) -> Node {
    let padding = padding(node);
    let spacing = spacing(node);
    let child_width = hstack_child_width(node, ctx.width);
    let inner_height = tallest(node.children(), child_width);

    let mut x = ctx.origin_x.saturating_add(padding);
    let children = node
        .children()
        .iter()
        .map(|child| {
            let child_ctx = LayoutContext {
                width: child_width,
                height: inner_height,
                origin_x: x,
                origin_y: ctx.origin_y.saturating_add(padding),
            };
            x = x.saturating_add(child_width).saturating_add(spacing);
            layout(child, child_ctx)
        })
        .collect();

    let height = inner_height.saturating_add(twice(padding));
    finish(node, Region::new(ctx.origin_x, ctx.origin_y, ctx.width, height), children)
}

fn layout_panel(node: &Node, ctx: LayoutContext) -> Node {
    let inset = panel_inset(node);
    let spacing = spacing(node);
    let inner_width = shrink(ctx.width, inset);
    let children = stack_children(
        node.children(),
        inner_width,
        spacing,
        ctx.origin_x.saturating_add(inset),
        ctx.origin_y.saturating_add(inset),
    );
    let height = stacked_height(node.children(), inner_width, spacing).saturating_add(twice(inset));
    finish(node, Region::new(ctx.origin_x, ctx.origin_y, ctx.width, height), children)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Place `children` top to bottom starting at (`x`, `y`).
fn stack_children(children: &[Node], width: i32, spacing: i32, x: i32, y: i32) -> Vec<Node> {
    let mut y = y;
    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            if i > 0 {
                y = y.saturating_add(spacing);
            }
            let height = calculate_height(child, width);
            let laid_out = layout(child, LayoutContext::new(width, height).at(x, y));
            y = y.saturating_add(height);
            laid_out
        })
        .collect()
}

fn stacked_height(children: &[Node], width: i32, spacing: i32) -> i32 {
    if children.is_empty() {
        return 0;
    }
    let sum = children
        .iter()
        .fold(0i32, |sum, c| sum.saturating_add(calculate_height(c, width)));
    sum.saturating_add(spacing.saturating_mul(to_i32(children.len()) - 1))
}

fn tallest(children: &[Node], width: i32) -> i32 {
    children
        .iter()
        .map(|c| calculate_height(c, width))
        .max()
        .unwrap_or(0)
}

fn hstack_child_width(node: &Node, width: i32) -> i32 {
    let n = to_i32(node.children().len());
    if n == 0 {
        return 0;
    }
    let available = width
        .saturating_sub(spacing(node).saturating_mul(n - 1))
        .saturating_sub(twice(padding(node)));
    available.max(0) / n
}

fn inherit(node: &Node, ctx: LayoutContext) -> Vec<Node> {
    node.children().iter().map(|c| layout(c, ctx)).collect()
}

fn finish(node: &Node, region: Region, children: Vec<Node>) -> Node {
    let properties = node
        .properties()
        .with(keys::X, i64::from(region.x))
        .with(keys::Y, i64::from(region.y))
        .with(keys::WIDTH, i64::from(region.width))
        .with(keys::HEIGHT, i64::from(region.height));
    node.rebuild(properties, children)
}

fn panel_inset(node: &Node) -> i32 {
    let border = if node.prop(keys::BORDER).unwrap_or(false) { 1 } else { 0 };
    padding(node).saturating_add(border)
}

fn padding(node: &Node) -> i32 {
    non_negative(node.prop(keys::PADDING))
}

fn spacing(node: &Node) -> i32 {
    non_negative(node.prop(keys::SPACING))
}

fn rows_hint(node: &Node) -> Option<i32> {
    node.prop(keys::ROWS).map(|rows| non_negative(Some(rows)))
}

/// `width` minus `amount` on both sides, never negative.
fn shrink(width: i32, amount: i32) -> i32 {
    width.saturating_sub(twice(amount)).max(0)
}

fn twice(amount: i32) -> i32 {
    amount.saturating_mul(2)
}

fn non_negative(value: Option<i64>) -> i32 {
    value.unwrap_or(0).clamp(0, i64::from(i32::MAX)) as i32
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
