//! Paint engine: laid-out node tree to an ordered render command stream.
//!
//! [`paint`] walks the tree depth-first (parents before children) and emits each
//! node's own marks. [`paint_node`] emits one node's marks without its children, which
//! is what incremental repaints use. Both read geometry from the `x`/`y`/`width`/`height`
//! properties written by layout; an unlaid tree paints everything at the origin.

use unicode_width::UnicodeWidthChar;

use crate::color::{resolve_str, Capabilities, TerminalColor, Theme};
use crate::geometry::Region;
use crate::layout::measure::{display_width, wrap};
use crate::node::{keys, Node, NodeKind};

use super::border::BorderStyle;
use super::command::{RenderCommand, StyleFlags};

/// Braille spinner glyphs, indexed by `frame % len`.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FILLED: &str = "█";
const EMPTY: &str = "░";

/// What paint resolves colors against.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext<'a> {
    pub capabilities: &'a Capabilities,
    pub theme: &'a Theme,
}

impl<'a> PaintContext<'a> {
    pub fn new(capabilities: &'a Capabilities, theme: &'a Theme) -> Self {
        Self {
            capabilities,
            theme,
        }
    }
}

/// Paint a whole laid-out tree.
pub fn paint(tree: &Node, ctx: &PaintContext<'_>) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    for node in tree.preorder() {
        paint_own(node, ctx, &mut out);
    }
    out
}

/// Paint one node's own marks, without its children.
pub fn paint_node(node: &Node, ctx: &PaintContext<'_>) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    paint_own(node, ctx, &mut out);
    out
}

/// Blank out `region` with spaces.
pub fn erase(region: Region) -> Vec<RenderCommand> {
    let region = region.addressable();
    if region.is_empty() {
        return Vec::new();
    }
    let blank = " ".repeat(region.width as usize);
    (0..region.height)
        .flat_map(|row| {
            [
                RenderCommand::move_to(region.y + row, region.x),
                RenderCommand::Write(blank.clone()),
            ]
        })
        .collect()
}

/// One progress bar row of `width` cells: optional `label ` prefix, bracketed bar,
/// optional right-aligned percentage. The bar narrows to make room for both.
pub fn progress_line(value: f64, total: f64, width: usize, label: Option<&str>, show_percent: bool) -> String {
    let ratio = if total > 0.0 { value / total } else { 0.0 };
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };

    let prefix = label.map(|l| format!("{l} ")).unwrap_or_default();
    let suffix = if show_percent {
        format!(" {:>3}%", (ratio * 100.0).round() as u32)
    } else {
        String::new()
    };

    let bar_width = width.saturating_sub(display_width(&prefix) + suffix.len());
    if bar_width < 2 {
        return clip(&format!("{prefix}{}", suffix.trim_start()), width);
    }
    let inner = bar_width - 2;
    let filled = ((inner as f64) * ratio).floor() as usize;
    let filled = filled.min(inner);
    format!(
        "{prefix}[{}{}]{suffix}",
        FILLED.repeat(filled),
        EMPTY.repeat(inner - filled)
    )
}

// ---------------------------------------------------------------------------
// Per-kind marks
// ---------------------------------------------------------------------------

/// A row of text at a screen position.
struct Line {
    row: i32,
    col: i32,
    text: String,
}

impl Line {
    fn new(row: i32, col: i32, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            text: text.into(),
        }
    }
}

fn paint_own(node: &Node, ctx: &PaintContext<'_>, out: &mut Vec<RenderCommand>) {
    let region = Region::of(node);
    let width = region.width.max(0) as usize;
    let style = Style::of(node, ctx);

    let lines = match node.kind() {
        NodeKind::Text => {
            let content = node.prop_str(keys::CONTENT).unwrap_or("");
            rows_at(region, wrap(content, width))
        }
        NodeKind::Code => {
            let content = node.prop_str(keys::CONTENT).unwrap_or("");
            rows_at(region, content.lines().map(|l| clip(l, width)))
        }
        NodeKind::List => {
            let items = node.properties().get_ref(keys::ITEMS);
            let rows = items.into_iter().flatten().map(|item| clip(&format!("• {item}"), width));
            rows_at(region, rows)
        }
        NodeKind::Tree => {
            let items = node.properties().get_ref(keys::ITEMS).map_or(&[][..], |v| v.as_slice());
            let rows = items.iter().enumerate().map(|(i, item)| {
                let branch = if i + 1 == items.len() { "└─" } else { "├─" };
                clip(&format!("{branch} {item}"), width)
            });
            rows_at(region, rows)
        }
        NodeKind::Table => {
            let items = node.properties().get_ref(keys::ITEMS);
            rows_at(region, items.into_iter().flatten().map(|row| clip(row, width)))
        }
        NodeKind::KeyValue => {
            let entries = node.properties().get_ref(keys::ENTRIES);
            let rows = entries
                .into_iter()
                .flatten()
                .map(|(k, v)| clip(&format!("{k}: {v}"), width));
            rows_at(region, rows)
        }
        NodeKind::Panel => panel_lines(node, region),
        NodeKind::Divider => {
            let rule = node
                .prop_str(keys::RULE)
                .and_then(|r| r.chars().next())
                .unwrap_or('─');
            let cell = UnicodeWidthChar::width(rule).unwrap_or(1).max(1);
            vec![Line::new(region.y, region.x, rule.to_string().repeat(width / cell))]
        }
        NodeKind::ProgressBar | NodeKind::Meter | NodeKind::Gauge => {
            let text = progress_line(
                node.prop(keys::VALUE).unwrap_or(0.0),
                node.prop(keys::TOTAL).unwrap_or(1.0),
                width,
                node.prop_str(keys::LABEL),
                node.prop(keys::SHOW_PERCENT).unwrap_or(false),
            );
            vec![Line::new(region.y, region.x, text)]
        }
        NodeKind::Badge | NodeKind::Tag | NodeKind::Note => {
            let text = node.prop_str(keys::LABEL).or_else(|| node.prop_str(keys::CONTENT));
            let parts: Vec<&str> = [node.prop_str(keys::ICON), text].into_iter().flatten().collect();
            if parts.is_empty() {
                Vec::new()
            } else {
                vec![Line::new(region.y, region.x, clip(&parts.join(" "), width))]
            }
        }
        NodeKind::Spinner => {
            let glyph = SPINNER_FRAMES[(node.frame() % SPINNER_FRAMES.len() as u64) as usize];
            out.push(RenderCommand::Frame {
                address: node.address().clone(),
                payload: glyph.to_string(),
            });
            let text = match node.prop_str(keys::LABEL) {
                Some(label) => format!("{glyph} {label}"),
                None => glyph.to_string(),
            };
            vec![Line::new(region.y, region.x, clip(&text, width))]
        }
        _ => Vec::new(),
    };

    emit(out, &style, lines);
}

fn rows_at(region: Region, rows: impl IntoIterator<Item = String>) -> Vec<Line> {
    rows.into_iter()
        .enumerate()
        .map(|(i, text)| Line::new(region.y.saturating_add(i as i32), region.x, text))
        .collect()
}

/// Box outline for a bordered panel. Borderless panels have no marks of their own.
fn panel_lines(node: &Node, region: Region) -> Vec<Line> {
    if !node.prop(keys::BORDER).unwrap_or(false) || region.width < 2 || region.height < 2 {
        return Vec::new();
    }
    let chars = BorderStyle::from_name(node.prop_str(keys::BORDER_STYLE).unwrap_or("square")).chars();
    let inner = (region.width - 2) as usize;
    let h = chars.horizontal.to_string();

    let title = node
        .prop_str(keys::TITLE)
        .map(|t| clip(t, inner.saturating_sub(2)))
        .filter(|t| !t.is_empty())
        .map(|t| format!(" {t} "));
    let top_inner = match title {
        Some(label) => {
            let lw = display_width(&label);
            let left = (inner - lw) / 2;
            format!("{}{label}{}", h.repeat(left), h.repeat(inner - lw - left))
        }
        None => h.repeat(inner),
    };

    let right = region.right().saturating_sub(1);
    let bottom = region.bottom().saturating_sub(1);
    let last_row = i32::from(u16::MAX);
    let mut lines = vec![Line::new(
        region.y,
        region.x,
        format!("{}{top_inner}{}", chars.top_left, chars.top_right),
    )];
    for row in (region.y.saturating_add(1)..bottom.min(last_row)).filter(|row| *row >= 0) {
        lines.push(Line::new(row, region.x, chars.vertical));
        lines.push(Line::new(row, right, chars.vertical));
    }
    lines.push(Line::new(
        bottom,
        region.x,
        format!("{}{}{}", chars.bottom_left, h.repeat(inner), chars.bottom_right),
    ));
    lines
}

/// Truncate `text` to at most `width` display cells.
fn clip(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += UnicodeWidthChar::width(*ch).unwrap_or(0);
            used <= width
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Style {
    fg: Option<TerminalColor>,
    bg: Option<TerminalColor>,
    flags: StyleFlags,
}

impl Style {
    fn of(node: &Node, ctx: &PaintContext<'_>) -> Style {
        let fg = node
            .prop_str(keys::FOREGROUND)
            .or_else(|| node.prop_str(keys::TINT))
            .and_then(|text| resolve_str(text, ctx.capabilities, ctx.theme, true));
        let bg = node
            .prop_str(keys::BACKGROUND)
            .and_then(|text| resolve_str(text, ctx.capabilities, ctx.theme, false));

        let mut flags = StyleFlags::NONE;
        for (key, flag) in [
            (keys::BOLD, StyleFlags::BOLD),
            (keys::ITALIC, StyleFlags::ITALIC),
            (keys::UNDERLINE, StyleFlags::UNDERLINE),
            (keys::DIM, StyleFlags::DIM),
            (keys::INVERT, StyleFlags::REVERSE),
        ] {
            if node.prop(key).unwrap_or(false) {
                flags |= flag;
            }
        }
        Style { fg, bg, flags }
    }

    fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }
}

fn emit(out: &mut Vec<RenderCommand>, style: &Style, lines: Vec<Line>) {
    if lines.is_empty() {
        return;
    }
    if let Some(fg) = style.fg {
        out.push(RenderCommand::SetForeground(fg));
    }
    if let Some(bg) = style.bg {
        out.push(RenderCommand::SetBackground(bg));
    }
    if !style.flags.is_empty() {
        out.push(RenderCommand::SetStyle(style.flags));
    }
    for line in lines {
        out.push(RenderCommand::move_to(line.row, line.col));
        out.push(RenderCommand::Write(line.text));
    }
    if !style.is_plain() {
        out.push(RenderCommand::Reset);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, LayoutContext};
    use crate::node::NodeBuilder;
    use crate::testing::commands_to_string;
    use pretty_assertions::assert_eq;

    fn render(tree: NodeBuilder, width: u16, height: u16) -> String {
        let caps = Capabilities::none().with_size(width, height);
        let theme = Theme::default();
        let tree = tree.build().unwrap();
        let laid = layout(&tree, LayoutContext::viewport(&caps));
        let commands = paint(&laid, &PaintContext::new(&caps, &theme));
        commands_to_string(&commands, width, height)
    }

    fn text(content: &str) -> NodeBuilder {
        Node::build(NodeKind::Text).prop(keys::CONTENT, content)
    }

    #[test]
    fn progress_fill_count() {
        let line = progress_line(0.65, 1.0, 22, None, false);
        assert_eq!(line.chars().filter(|c| *c == '█').count(), 13);
        assert_eq!(line.chars().filter(|c| *c == '░').count(), 7);
        assert_eq!(display_width(&line), 22);
    }

    #[test]
    fn progress_clamps_and_handles_zero_total() {
        assert_eq!(progress_line(5.0, 1.0, 6, None, false), "[████]");
        assert_eq!(progress_line(-1.0, 1.0, 6, None, false), "[░░░░]");
        assert_eq!(progress_line(1.0, 0.0, 6, None, false), "[░░░░]");
        assert_eq!(progress_line(f64::NAN, 1.0, 6, None, false), "[░░░░]");
    }

    #[test]
    fn progress_percent_narrows_bar() {
        let line = progress_line(0.5, 1.0, 15, None, true);
        assert_eq!(line, "[████░░░░]  50%");
        assert_eq!(display_width(&line), 15);
    }

    #[test]
    fn progress_label_prefix() {
        assert_eq!(progress_line(1.0, 2.0, 10, Some("dl"), false), "dl [██░░░]");
    }

    #[test]
    fn text_wraps_to_width() {
        let screen = render(Node::build(NodeKind::VStack).child(text("abcdefghij")), 4, 3);
        insta::assert_snapshot!(screen, @r"
abcd
efgh
ij
");
    }

    #[test]
    fn bordered_panel_with_title() {
        let tree = Node::build(NodeKind::Panel)
            .prop(keys::BORDER, true)
            .prop(keys::TITLE, "Title")
            .child(text("hi"));
        insta::assert_snapshot!(render(tree, 11, 3), @r"
┌─ Title ─┐
│hi       │
└─────────┘
");
    }

    #[test]
    fn rounded_panel_without_title() {
        let tree = Node::build(NodeKind::Panel)
            .prop(keys::BORDER, true)
            .prop(keys::BORDER_STYLE, "rounded")
            .child(text("ok"));
        insta::assert_snapshot!(render(tree, 6, 3), @r"
╭────╮
│ok  │
╰────╯
");
    }

    #[test]
    fn borderless_panel_paints_only_children() {
        let tree = Node::build(NodeKind::Panel).child(text("plain"));
        assert_eq!(render(tree, 8, 1), "plain");
    }

    #[test]
    fn stack_of_mixed_kinds() {
        let tree = Node::build(NodeKind::VStack)
            .child(text("head"))
            .child(Node::build(NodeKind::Divider))
            .child(
                Node::build(NodeKind::ProgressBar)
                    .prop(keys::VALUE, 0.5)
                    .prop(keys::TOTAL, 1.0),
            )
            .child(Node::build(NodeKind::Badge).prop(keys::ICON, "✓").prop(keys::LABEL, "done"));
        insta::assert_snapshot!(render(tree, 10, 4), @r"
head
──────────
[████░░░░]
✓ done
");
    }

    #[test]
    fn spinner_glyph_follows_frame() {
        let caps = Capabilities::none();
        let theme = Theme::default();
        let spinner = |frame: u64| {
            Node::build(NodeKind::Spinner)
                .prop(keys::WIDTH, 20)
                .prop(keys::LABEL, "loading")
                .frame(frame)
                .build()
                .unwrap()
        };
        let ctx = PaintContext::new(&caps, &theme);
        let first = paint_node(&spinner(0), &ctx);
        let wrapped = paint_node(&spinner(10), &ctx);
        let third = paint_node(&spinner(2), &ctx);
        assert_eq!(commands_to_string(&first, 20, 1), "⠋ loading");
        assert_eq!(first, wrapped);
        assert_eq!(commands_to_string(&third, 20, 1), "⠹ loading");
        assert!(matches!(&first[0], RenderCommand::Frame { payload, .. } if payload == "⠋"));
    }

    #[test]
    fn styled_text_sets_and_resets() {
        let caps = Capabilities::true_color();
        let theme = Theme::empty();
        let node = text("x")
            .prop(keys::WIDTH, 10)
            .prop(keys::FOREGROUND, "#ff0000")
            .prop(keys::BOLD, true)
            .build()
            .unwrap();
        let commands = paint_node(&node, &PaintContext::new(&caps, &theme));
        assert_eq!(
            commands,
            vec![
                RenderCommand::SetForeground(TerminalColor::Rgb { r: 255, g: 0, b: 0 }),
                RenderCommand::SetStyle(StyleFlags::BOLD),
                RenderCommand::MoveCursor { row: 0, col: 0 },
                RenderCommand::write("x"),
                RenderCommand::Reset,
            ]
        );
    }

    #[test]
    fn malformed_color_emits_no_color_command() {
        let caps = Capabilities::true_color();
        let theme = Theme::empty();
        let node = text("x")
            .prop(keys::WIDTH, 10)
            .prop(keys::FOREGROUND, "#zzz")
            .build()
            .unwrap();
        let commands = paint_node(&node, &PaintContext::new(&caps, &theme));
        assert_eq!(
            commands,
            vec![RenderCommand::MoveCursor { row: 0, col: 0 }, RenderCommand::write("x")]
        );
    }

    #[test]
    fn badge_invert_is_reverse() {
        let caps = Capabilities::none();
        let theme = Theme::default();
        let node = Node::build(NodeKind::Badge)
            .prop(keys::WIDTH, 10)
            .prop(keys::LABEL, "NEW")
            .prop(keys::INVERT, true)
            .build()
            .unwrap();
        let commands = paint_node(&node, &PaintContext::new(&caps, &theme));
        assert_eq!(commands[0], RenderCommand::SetStyle(StyleFlags::REVERSE));
        assert_eq!(commands.last(), Some(&RenderCommand::Reset));
    }

    #[test]
    fn paint_node_skips_children() {
        let caps = Capabilities::none();
        let theme = Theme::default();
        let tree = Node::build(NodeKind::VStack).child(text("child")).build().unwrap();
        assert!(paint_node(&tree, &PaintContext::new(&caps, &theme)).is_empty());
        assert!(!paint(&tree, &PaintContext::new(&caps, &theme)).is_empty());
    }

    #[test]
    fn list_and_key_value_rows() {
        let mut entries = crate::node::Record::new();
        entries.insert("a".into(), "1".into());
        entries.insert("b".into(), "2".into());
        let tree = Node::build(NodeKind::VStack)
            .child(Node::build(NodeKind::List).prop(keys::ITEMS, vec!["x".to_string(), "y".to_string()]))
            .child(Node::build(NodeKind::KeyValue).prop(keys::ENTRIES, entries));
        assert_eq!(render(tree, 10, 4), "• x\n• y\na: 1\nb: 2");
    }

    #[test]
    fn erase_blanks_region() {
        let commands = erase(Region::new(2, 1, 3, 2));
        assert_eq!(
            commands,
            vec![
                RenderCommand::MoveCursor { row: 1, col: 2 },
                RenderCommand::write("   "),
                RenderCommand::MoveCursor { row: 2, col: 2 },
                RenderCommand::write("   "),
            ]
        );
        assert!(erase(Region::EMPTY).is_empty());
    }
}
