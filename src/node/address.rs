//! Node identity: positional [`Address`] and caller-assigned [`LogicalId`].

use std::fmt;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Hierarchical position of a node in the tree, e.g. `"vstack.text.0"`.
///
/// An address says *where* a node sits, not *which* element it is. Two nodes at the
/// same address in consecutive trees are only the same element if the reconciler
/// says so.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    /// Create an address from any string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Address of the `index`-th child of kind `tag` under this address.
    pub fn child(&self, tag: &str, index: usize) -> Address {
        Address(format!("{}.{}.{}", self.0, tag, index))
    }

    /// The raw path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of dot-separated segments.
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split('.').count()
        }
    }

    /// Whether `self` lies inside the subtree rooted at `ancestor`.
    pub fn is_within(&self, ancestor: &Address) -> bool {
        self.0 == ancestor.0
            || (self.0.starts_with(&ancestor.0)
                && self.0.as_bytes().get(ancestor.0.len()) == Some(&b'.'))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// LogicalId
// ---------------------------------------------------------------------------

/// Stable, caller-assigned identity used to match nodes across tree versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(String);

impl LogicalId {
    /// Create a logical id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LogicalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
