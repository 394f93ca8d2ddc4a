//! Immutable node trees and their builder.
//!
//! A [`Node`] owns its children; the `parent_address` field is a plain lookup key
//! so there are no back-pointers and no reference cycles. Children are held behind an
//! `Arc` which makes cloning a node (or a whole subtree) a reference-count bump.

use std::collections::HashSet;
use std::sync::Arc;

use super::address::{Address, LogicalId};
use super::kind::NodeKind;
use super::props::{PropData, PropKey, PropertyContainer};

/// Construction-time integrity violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("duplicate logical id `{id}` among children of `{parent}`")]
    DuplicateLogicalId { parent: Address, id: LogicalId },

    #[error("child address `{child}` is not nested under `{parent}`")]
    DetachedAddress { parent: Address, child: Address },
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One immutable element of a UI description.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    address: Address,
    logical_id: Option<LogicalId>,
    kind: NodeKind,
    children: Arc<[Node]>,
    properties: PropertyContainer,
    parent_address: Option<Address>,
    frame: u64,
}

impl Node {
    /// Start building a node of the given kind.
    pub fn build(kind: NodeKind) -> NodeBuilder {
        NodeBuilder::new(kind)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn logical_id(&self) -> Option<&LogicalId> {
        self.logical_id.as_ref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn properties(&self) -> &PropertyContainer {
        &self.properties
    }

    pub fn parent_address(&self) -> Option<&Address> {
        self.parent_address.as_ref()
    }

    /// Animation frame counter. Bumping it marks the node changed even when its
    /// properties are equal.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Read a property.
    pub fn prop<T: PropData>(&self, key: PropKey<T>) -> Option<T> {
        self.properties.get(key)
    }

    /// Read a string property without cloning.
    pub fn prop_str(&self, key: PropKey<String>) -> Option<&str> {
        self.properties.get_str(key)
    }

    /// A copy of this node with different properties.
    pub fn with_properties(&self, properties: PropertyContainer) -> Node {
        Node {
            properties,
            ..self.clone()
        }
    }

    /// A copy of this node with a different frame counter.
    pub fn with_frame(&self, frame: u64) -> Node {
        Node {
            frame,
            ..self.clone()
        }
    }

    /// A copy with new properties and children. Identity fields are kept.
    pub(crate) fn rebuild(&self, properties: PropertyContainer, children: Vec<Node>) -> Node {
        Node {
            address: self.address.clone(),
            logical_id: self.logical_id.clone(),
            kind: self.kind,
            children: children.into(),
            properties,
            parent_address: self.parent_address.clone(),
            frame: self.frame,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// Always false: a subtree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pre-order depth-first traversal (parent before children).
    pub fn preorder(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for child in current.children.iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Post-order depth-first traversal (children before parent).
    pub fn postorder(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        collect_postorder(self, &mut result);
        result
    }

    /// Find the node at `address` inside this subtree.
    pub fn find(&self, address: &Address) -> Option<&Node> {
        if &self.address == address {
            return Some(self);
        }
        self.children
            .iter()
            .filter(|c| address.is_within(&c.address) || !c.address.is_within(&self.address))
            .find_map(|c| c.find(address))
    }

    /// Re-check sibling logical-id uniqueness and address nesting across the whole
    /// subtree.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        check_unique_ids(&self.address, self.children.iter().map(|c| c.logical_id.as_ref()))?;
        for child in self.children.iter() {
            check_nested(&self.address, &child.address)?;
        }
        self.children.iter().try_for_each(Node::validate)
    }
}

fn collect_postorder<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    for child in node.children.iter() {
        collect_postorder(child, out);
    }
    out.push(node);
}

fn check_unique_ids<'a>(
    parent: &Address,
    ids: impl Iterator<Item = Option<&'a LogicalId>>,
) -> Result<(), IntegrityError> {
    let mut seen = HashSet::new();
    for id in ids.flatten() {
        if !seen.insert(id) {
            return Err(IntegrityError::DuplicateLogicalId {
                parent: parent.clone(),
                id: id.clone(),
            });
        }
    }
    Ok(())
}

/// A child's address must extend its parent's.
fn check_nested(parent: &Address, child: &Address) -> Result<(), IntegrityError> {
    if child != parent && child.is_within(parent) {
        Ok(())
    } else {
        Err(IntegrityError::DetachedAddress {
            parent: parent.clone(),
            child: child.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// NodeBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Node`] trees. Addresses and parent addresses are assigned on
/// [`build`](NodeBuilder::build): the root gets its kind tag (unless overridden) and each
/// child gets `<parent>.<tag>.<index>`.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    kind: NodeKind,
    logical_id: Option<LogicalId>,
    address: Option<Address>,
    properties: PropertyContainer,
    children: Vec<NodeBuilder>,
    frame: u64,
}

impl NodeBuilder {
    /// Create a builder for a node of `kind`.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            logical_id: None,
            address: None,
            properties: PropertyContainer::new(),
            children: Vec::new(),
            frame: 0,
        }
    }

    /// Set the logical id (builder).
    pub fn id(mut self, id: impl Into<LogicalId>) -> Self {
        self.logical_id = Some(id.into());
        self
    }

    /// Override the computed address (builder).
    pub fn address(mut self, address: impl Into<Address>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set a property (builder).
    pub fn prop<T: PropData>(mut self, key: PropKey<T>, value: impl Into<T>) -> Self {
        self.properties = self.properties.with(key, value);
        self
    }

    /// Replace all properties (builder).
    pub fn properties(mut self, properties: PropertyContainer) -> Self {
        self.properties = properties;
        self
    }

    /// Append a child (builder).
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children (builder).
    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the frame counter (builder).
    pub fn frame(mut self, frame: u64) -> Self {
        self.frame = frame;
        self
    }

    /// Assign addresses and freeze the tree.
    ///
    /// Fails if two siblings anywhere in the tree share a logical id, or if an
    /// overridden child address does not extend its parent's address.
    pub fn build(self) -> Result<Node, IntegrityError> {
        let address = self
            .address
            .clone()
            .unwrap_or_else(|| Address::new(self.kind.tag()));
        self.build_at(address, None)
    }

    fn build_at(self, address: Address, parent: Option<Address>) -> Result<Node, IntegrityError> {
        check_unique_ids(&address, self.children.iter().map(|c| c.logical_id.as_ref()))?;

        let children = self
            .children
            .into_iter()
            .enumerate()
            .map(|(index, child)| {
                let child_address = child
                    .address
                    .clone()
                    .unwrap_or_else(|| address.child(child.kind.tag(), index));
                check_nested(&address, &child_address)?;
                child.build_at(child_address, Some(address.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node {
            address,
            logical_id: self.logical_id,
            kind: self.kind,
            children: children.into(),
            properties: self.properties,
            parent_address: parent,
            frame: self.frame,
        })
    }
}
