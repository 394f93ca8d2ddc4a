//! Reconciliation: diff two immutable trees into insert/update/delete/move operations.

pub mod diff;
pub mod result;

pub use diff::{reconcile, same_node};
pub use result::{Move, ReconcileResult};
