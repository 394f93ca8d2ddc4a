//! Reconciliation output.

use std::collections::HashSet;

use crate::node::{Address, LogicalId, Node};

/// A node that kept its logical id but changed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Address,
    pub to: Address,
    pub logical_id: LogicalId,
}

/// The operations that turn the old tree into the new one.
///
/// - `insertions`: every inserted node, parents before children.
/// - `updates`: the new value of every matched node whose kind, properties, or frame changed.
/// - `deletions`: every deleted node, children before parents.
/// - `moves`: logical-id matches whose address changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileResult {
    pub insertions: Vec<Node>,
    pub updates: Vec<Node>,
    pub deletions: Vec<Node>,
    pub moves: Vec<Move>,
}

impl ReconcileResult {
    /// Whether any operation was recorded.
    pub fn has_changes(&self) -> bool {
        !(self.insertions.is_empty()
            && self.updates.is_empty()
            && self.deletions.is_empty()
            && self.moves.is_empty())
    }

    /// Total number of recorded operations.
    pub fn change_count(&self) -> usize {
        self.insertions.len() + self.updates.len() + self.deletions.len() + self.moves.len()
    }

    /// Inserted nodes whose parent was not itself inserted, in insertion order.
    pub fn insertion_roots(&self) -> Vec<&Node> {
        subtree_roots(&self.insertions)
    }

    /// Deleted nodes whose parent was not itself deleted, in deletion order.
    pub fn deletion_roots(&self) -> Vec<&Node> {
        subtree_roots(&self.deletions)
    }
}

fn subtree_roots(nodes: &[Node]) -> Vec<&Node> {
    let members: HashSet<&Address> = nodes.iter().map(Node::address).collect();
    nodes
        .iter()
        .filter(|n| n.parent_address().is_none_or(|p| !members.contains(p)))
        .collect()
}
