//! One commit cycle, minus dispatch: reconcile, layout, and the command stream.
//!
//! Full repaints clear the screen and paint the whole laid-out tree. Incremental
//! repaints touch only what changed, in this order:
//!
//! 1. `End` marker and erase for every deleted subtree root
//! 2. erase of the previous extent of every dirty node
//! 3. `End`/`Begin` marker pair for every move, followed by the moved node's repaint
//! 4. repaint of the remaining dirty nodes, parents first
//! 5. `Begin` marker and full paint for every inserted subtree root
//! 6. `Flush`
//!
//! A node is dirty when it was updated, moved, or laid out at a different place than
//! before. Repainting a leaf emits its own marks; repainting a container paints its
//! whole subtree, so nothing below it is repainted again.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::color::Capabilities;
use crate::geometry::Region;
use crate::layout::{layout, LayoutContext};
use crate::node::{Address, Node};
use crate::reconcile::{reconcile, ReconcileResult};
use crate::render::{erase, paint, paint_node, PaintContext, RenderCommand};

use super::options::SessionOptions;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How a commit was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitMode {
    /// Clear and repaint everything.
    Full,
    /// Repaint only what changed.
    Incremental,
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitMode::Full => f.write_str("full"),
            CommitMode::Incremental => f.write_str("incremental"),
        }
    }
}

/// Summary of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub mode: CommitMode,
    pub insertions: usize,
    pub updates: usize,
    pub deletions: usize,
    pub moves: usize,
    /// Unchanged nodes repainted because layout placed them elsewhere.
    pub relocations: usize,
    /// Number of render commands dispatched.
    pub commands: usize,
    /// Sinks whose `apply` failed for this commit.
    pub failed_sinks: usize,
}

impl CommitReport {
    /// Whether reconciliation recorded any operation.
    pub fn has_changes(&self) -> bool {
        self.insertions + self.updates + self.deletions + self.moves > 0
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// The last committed tree, as described and as laid out.
#[derive(Debug, Clone)]
pub struct Committed {
    pub tree: Node,
    pub laid_out: Node,
}

/// Everything a commit needs before dispatch.
#[derive(Debug, Clone)]
pub struct PreparedCommit {
    pub committed: Committed,
    pub result: ReconcileResult,
    pub commands: Vec<RenderCommand>,
    pub report: CommitReport,
}

/// Reconcile `tree` against `previous`, lay it out for `capabilities`, and build the
/// command stream. `force_full` requests a full repaint even when an incremental one
/// would do (after a resize).
pub fn prepare_commit(
    previous: Option<&Committed>,
    tree: Node,
    capabilities: &Capabilities,
    options: &SessionOptions,
    force_full: bool,
) -> PreparedCommit {
    let result = reconcile(previous.map(|p| &p.tree), &tree);
    let laid_out = layout(&tree, LayoutContext::viewport(capabilities));
    let ctx = PaintContext::new(capabilities, &options.theme);

    let (mode, commands, relocations) = match previous {
        Some(previous) if result.has_changes() && !force_full => {
            let (commands, relocations) = incremental(&previous.laid_out, &laid_out, &result, &ctx);
            (CommitMode::Incremental, commands, relocations)
        }
        _ => (CommitMode::Full, full_repaint(&laid_out, &ctx, options.headless), 0),
    };

    let report = CommitReport {
        mode,
        insertions: result.insertions.len(),
        updates: result.updates.len(),
        deletions: result.deletions.len(),
        moves: result.moves.len(),
        relocations,
        commands: commands.len(),
        failed_sinks: 0,
    };

    PreparedCommit {
        committed: Committed { tree, laid_out },
        result,
        commands,
        report,
    }
}

fn full_repaint(laid_out: &Node, ctx: &PaintContext<'_>, headless: bool) -> Vec<RenderCommand> {
    let mut out = Vec::new();
    if !headless {
        out.push(RenderCommand::HideCursor);
        out.push(RenderCommand::Clear);
    }
    out.extend(paint(laid_out, ctx));
    out.push(RenderCommand::Flush);
    out
}

fn incremental(
    old: &Node,
    new: &Node,
    result: &ReconcileResult,
    ctx: &PaintContext<'_>,
) -> (Vec<RenderCommand>, usize) {
    let old_index = index(old);
    let new_index = index(new);
    let old_region = |address: &Address| old_index.get(address).map(|n| Region::of(n));

    let inserted: HashSet<&Address> = result.insertions.iter().map(Node::address).collect();
    let updated: HashSet<&Address> = result.updates.iter().map(Node::address).collect();
    let moved_from: HashMap<&Address, &Address> =
        result.moves.iter().map(|m| (&m.to, &m.from)).collect();

    // Dirty nodes in preorder. Containers cover their descendants.
    let mut dirty: Vec<&Node> = Vec::new();
    let mut containers: Vec<&Address> = Vec::new();
    let mut relocations = 0;
    for node in new.preorder() {
        let address = node.address();
        if inserted.contains(address) || containers.iter().any(|c| address.is_within(c)) {
            continue;
        }
        let changed = updated.contains(address) || moved_from.contains_key(address);
        let relocated = !changed
            && old_index
                .get(address)
                .is_some_and(|was| Region::of(was) != Region::of(node));
        if changed || relocated {
            if relocated {
                relocations += 1;
            }
            if !node.children().is_empty() {
                containers.push(address);
            }
            dirty.push(node);
        }
    }
    let covered = |address: &Address| containers.iter().any(|c| address.is_within(c));

    let mut out = Vec::new();

    for node in result.deletion_roots() {
        out.push(RenderCommand::End {
            address: node.address().clone(),
        });
        if let Some(region) = old_region(node.address()) {
            out.extend(erase(region));
        }
    }

    for node in &dirty {
        let from = moved_from.get(node.address()).copied().unwrap_or(node.address());
        if let Some(region) = old_region(from) {
            out.extend(erase(region));
        }
    }

    let mut repainted: HashSet<&Address> = HashSet::new();
    for m in &result.moves {
        out.push(RenderCommand::End {
            address: m.from.clone(),
        });
        let Some(node) = new_index.get(&m.to) else {
            continue;
        };
        out.push(RenderCommand::Begin {
            address: m.to.clone(),
            kind: node.kind(),
            parent: node.parent_address().cloned(),
        });
        if dirty.iter().any(|d| d.address() == &m.to) {
            repaint(node, ctx, &mut out);
            repainted.insert(node.address());
        }
    }

    for node in &dirty {
        if !repainted.contains(node.address()) {
            repaint(node, ctx, &mut out);
        }
    }

    for root in result.insertion_roots() {
        let address = root.address();
        out.push(RenderCommand::Begin {
            address: address.clone(),
            kind: root.kind(),
            parent: root.parent_address().cloned(),
        });
        if let Some(node) = new_index.get(address) {
            if !covered(address) {
                out.extend(paint(node, ctx));
            }
        }
    }

    out.push(RenderCommand::Flush);
    (out, relocations)
}

fn repaint(node: &Node, ctx: &PaintContext<'_>, out: &mut Vec<RenderCommand>) {
    if node.children().is_empty() {
        out.extend(paint_node(node, ctx));
    } else {
        out.extend(paint(node, ctx));
    }
}

fn index(tree: &Node) -> HashMap<&Address, &Node> {
    tree.preorder().into_iter().map(|n| (n.address(), n)).collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{keys, NodeBuilder, NodeKind};
    use crate::testing::commands_to_string;
    use pretty_assertions::assert_eq;

    fn caps() -> Capabilities {
        Capabilities::none().with_size(10, 4)
    }

    fn text(content: &str) -> NodeBuilder {
        Node::build(NodeKind::Text).prop(keys::CONTENT, content)
    }

    fn stack(children: impl IntoIterator<Item = NodeBuilder>) -> Node {
        Node::build(NodeKind::VStack)
            .address("root")
            .children(children)
            .build()
            .unwrap()
    }

    fn commit(previous: Option<&Committed>, tree: Node) -> PreparedCommit {
        prepare_commit(previous, tree, &caps(), &SessionOptions::default(), false)
    }

    /// Rows (y) written to by non-blank `Write`s or erases.
    fn touched_rows(commands: &[RenderCommand]) -> Vec<u16> {
        let mut rows = Vec::new();
        let mut current = 0;
        for command in commands {
            match command {
                RenderCommand::MoveCursor { row, .. } => current = *row,
                RenderCommand::Write(_) if !rows.contains(&current) => rows.push(current),
                _ => {}
            }
        }
        rows
    }

    #[test]
    fn first_commit_is_full() {
        let prepared = commit(None, stack([text("a"), text("b")]));
        assert_eq!(prepared.report.mode, CommitMode::Full);
        assert_eq!(prepared.report.insertions, 3);
        assert_eq!(prepared.commands[..2], [RenderCommand::HideCursor, RenderCommand::Clear]);
        assert_eq!(prepared.commands.last(), Some(&RenderCommand::Flush));
        assert_eq!(commands_to_string(&prepared.commands, 10, 2), "a\nb");
    }

    #[test]
    fn headless_full_repaint_skips_terminal_control() {
        let options = SessionOptions::default().with_headless(true);
        let prepared = prepare_commit(None, stack([text("a")]), &caps(), &options, false);
        assert!(!prepared.commands.contains(&RenderCommand::Clear));
        assert!(!prepared.commands.contains(&RenderCommand::HideCursor));
    }

    #[test]
    fn unchanged_tree_repaints_fully() {
        let first = commit(None, stack([text("a")]));
        let second = commit(Some(&first.committed), stack([text("a")]));
        assert_eq!(second.report.mode, CommitMode::Full);
        assert!(!second.report.has_changes());
    }

    #[test]
    fn forced_full_repaint() {
        let first = commit(None, stack([text("a")]));
        let second = prepare_commit(
            Some(&first.committed),
            stack([text("b")]),
            &caps(),
            &SessionOptions::default(),
            true,
        );
        assert_eq!(second.report.mode, CommitMode::Full);
        assert_eq!(second.report.updates, 1);
    }

    #[test]
    fn leaf_change_touches_only_that_node() {
        let first = commit(None, stack([text("a"), text("b"), text("c")]));
        let second = commit(Some(&first.committed), stack([text("a"), text("B"), text("c")]));

        assert_eq!(second.report.mode, CommitMode::Incremental);
        assert_eq!(second.report.updates, 1);
        assert_eq!(second.report.relocations, 0);
        assert_eq!(touched_rows(&second.commands), vec![1]);
        assert_eq!(
            second.commands,
            vec![
                RenderCommand::MoveCursor { row: 1, col: 0 },
                RenderCommand::write(" ".repeat(10)),
                RenderCommand::MoveCursor { row: 1, col: 0 },
                RenderCommand::write("B"),
                RenderCommand::Flush,
            ]
        );

        let screen = [first.commands.clone(), second.commands.clone()].concat();
        assert_eq!(commands_to_string(&screen, 10, 3), "a\nB\nc");
    }

    #[test]
    fn deletion_emits_end_and_relocates_followers() {
        let first = commit(
            None,
            stack([text("a").id("a"), text("b").id("b"), text("c").id("c")]),
        );
        let second = commit(Some(&first.committed), stack([text("a").id("a"), text("c").id("c")]));

        assert_eq!(second.report.deletions, 1);
        assert_eq!(second.report.moves, 1);
        assert!(second.commands.contains(&RenderCommand::End {
            address: Address::new("root.text.1")
        }));

        let screen = [first.commands.clone(), second.commands.clone()].concat();
        assert_eq!(commands_to_string(&screen, 10, 3), "a\nc\n");
    }

    #[test]
    fn insertion_emits_begin_and_subtree() {
        let first = commit(None, stack([text("a")]));
        let second = commit(
            Some(&first.committed),
            stack([text("a"), Node::build(NodeKind::HStack).children([text("x"), text("y")])]),
        );

        assert_eq!(second.report.insertions, 3);
        let begins: Vec<&RenderCommand> = second
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Begin { .. }))
            .collect();
        assert_eq!(
            begins,
            vec![&RenderCommand::Begin {
                address: Address::new("root.hstack.1"),
                kind: NodeKind::HStack,
                parent: Some(Address::new("root")),
            }]
        );
        let screen = [first.commands.clone(), second.commands.clone()].concat();
        assert_eq!(commands_to_string(&screen, 10, 2), "a\nx    y");
    }

    #[test]
    fn swapped_ids_move_and_repaint() {
        let first = commit(None, stack([text("one").id("1"), text("two").id("2")]));
        let second = commit(
            Some(&first.committed),
            stack([text("two").id("2"), text("one").id("1")]),
        );

        assert_eq!(second.report.moves, 2);
        assert_eq!(second.report.updates, 0);
        let screen = [first.commands.clone(), second.commands.clone()].concat();
        assert_eq!(commands_to_string(&screen, 10, 2), "two\none");
    }

    #[test]
    fn updated_container_repaints_its_subtree_once() {
        let panel = |title: &str| {
            Node::build(NodeKind::Panel)
                .prop(keys::BORDER, true)
                .prop(keys::TITLE, title)
                .child(text("in"))
        };
        let first = commit(None, stack([panel("A")]));
        let second = commit(Some(&first.committed), stack([panel("B")]));

        assert_eq!(second.report.updates, 1);
        let writes = second
            .commands
            .iter()
            .filter(|c| **c == RenderCommand::write("in"))
            .count();
        assert_eq!(writes, 1);
        let screen = [first.commands.clone(), second.commands.clone()].concat();
        assert_eq!(
            commands_to_string(&screen, 10, 3),
            "┌── B ───┐\n│in      │\n└────────┘"
        );
    }
}
