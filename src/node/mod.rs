//! Node model: immutable trees, positional addresses, logical ids, typed properties.

pub mod address;
pub mod keys;
pub mod kind;
pub mod props;
pub mod tree;

pub use address::{Address, LogicalId};
pub use kind::{NodeCategory, NodeKind};
pub use props::{PropData, PropKey, PropType, PropValue, PropertyContainer, Record};
pub use tree::{IntegrityError, Node, NodeBuilder};
