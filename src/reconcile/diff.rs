//! Tree diffing with stable-identity matching.
//!
//! Identity rule: two nodes are the same element if both carry a logical id and the
//! ids are equal, or if neither carries one and address and kind both match. Child
//! lists are matched in four ordered phases: logical id, position, insertion, deletion.

use std::collections::HashMap;

use crate::node::{LogicalId, Node};

use super::result::{Move, ReconcileResult};

/// Compare `old` against `new` and record the operations between them.
///
/// With no old tree every node of `new` is an insertion, in preorder.
pub fn reconcile(old: Option<&Node>, new: &Node) -> ReconcileResult {
    let mut result = ReconcileResult::default();
    match old {
        None => insert_subtree(new, &mut result),
        Some(old) if same_node(old, new) => diff_matched(old, new, &mut result),
        Some(old) => {
            delete_subtree(old, &mut result);
            insert_subtree(new, &mut result);
        }
    }
    result
}

/// The identity test applied to root pairs.
pub fn same_node(a: &Node, b: &Node) -> bool {
    match (a.logical_id(), b.logical_id()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.address() == b.address() && a.kind() == b.kind(),
        _ => false,
    }
}

fn diff_matched(old: &Node, new: &Node, result: &mut ReconcileResult) {
    if old.kind() != new.kind()
        || old.properties() != new.properties()
        || old.frame() != new.frame()
    {
        result.updates.push(new.clone());
    }
    diff_children(old, new, result);
}

fn diff_children(old: &Node, new: &Node, result: &mut ReconcileResult) {
    let old_children = old.children();
    let new_children = new.children();
    let mut old_used = vec![false; old_children.len()];
    let mut new_used = vec![false; new_children.len()];

    // Logical id phase.
    let by_id: HashMap<&LogicalId, usize> = old_children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| child.logical_id().map(|id| (id, i)))
        .collect();
    for (j, child) in new_children.iter().enumerate() {
        let Some(id) = child.logical_id() else {
            continue;
        };
        let Some(&i) = by_id.get(id) else {
            continue;
        };
        if old_used[i] {
            continue;
        }
        old_used[i] = true;
        new_used[j] = true;

        let previous = &old_children[i];
        if previous.address() != child.address() {
            result.moves.push(Move {
                from: previous.address().clone(),
                to: child.address().clone(),
                logical_id: id.clone(),
            });
        }
        diff_matched(previous, child, result);
    }

    // Positional phase: same slot, no ids on either side, same kind.
    for (j, child) in new_children.iter().enumerate() {
        if new_used[j] || child.logical_id().is_some() {
            continue;
        }
        let Some(previous) = old_children.get(j) else {
            continue;
        };
        if old_used[j] || previous.logical_id().is_some() || previous.kind() != child.kind() {
            continue;
        }
        old_used[j] = true;
        new_used[j] = true;
        diff_matched(previous, child, result);
    }

    for (child, _) in new_children.iter().zip(&new_used).filter(|(_, used)| !**used) {
        insert_subtree(child, result);
    }
    for (child, _) in old_children.iter().zip(&old_used).filter(|(_, used)| !**used) {
        delete_subtree(child, result);
    }
}

fn insert_subtree(node: &Node, result: &mut ReconcileResult) {
    result
        .insertions
        .extend(node.preorder().into_iter().cloned());
}

fn delete_subtree(node: &Node, result: &mut ReconcileResult) {
    result
        .deletions
        .extend(node.postorder().into_iter().cloned());
}
