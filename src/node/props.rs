//! Heterogeneous, copy-on-write property storage.
//!
//! A [`PropertyContainer`] maps `(name, type)` pairs to tagged [`PropValue`]s. Keys are
//! typed constants ([`PropKey<T>`]) so a read names both the property and the type it
//! expects; reading a key whose stored value has another type yields `None`.
//!
//! Containers are immutable values. [`PropertyContainer::with`] returns a new container
//! sharing nothing observable with the receiver.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// PropType / PropValue
// ---------------------------------------------------------------------------

/// Type tag half of a property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropType {
    String,
    Int,
    Double,
    Bool,
    StringList,
    Record,
}

/// Ordered string-to-string record (key/value rows, table cells, etc).
pub type Record = BTreeMap<String, String>;

/// A stored property value.
///
/// Doubles compare by bit pattern, so a NaN equals itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone)]
pub enum PropValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    StringList(Vec<String>),
    Record(Record),
}

impl PropValue {
    /// The type tag of this value.
    pub fn prop_type(&self) -> PropType {
        match self {
            PropValue::String(_) => PropType::String,
            PropValue::Int(_) => PropType::Int,
            PropValue::Double(_) => PropType::Double,
            PropValue::Bool(_) => PropType::Bool,
            PropValue::StringList(_) => PropType::StringList,
            PropValue::Record(_) => PropType::Record,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::String(a), PropValue::String(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Double(a), PropValue::Double(b)) => a.to_bits() == b.to_bits(),
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::StringList(a), PropValue::StringList(b)) => a == b,
            (PropValue::Record(a), PropValue::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropValue {}

/// Rust types that can be stored in a [`PropertyContainer`].
pub trait PropData: Clone {
    const TYPE: PropType;
    fn into_value(self) -> PropValue;
    fn from_value(value: &PropValue) -> Option<&Self>;
}

macro_rules! prop_data {
    ($ty:ty, $variant:ident) => {
        impl PropData for $ty {
            const TYPE: PropType = PropType::$variant;

            fn into_value(self) -> PropValue {
                PropValue::$variant(self)
            }

            fn from_value(value: &PropValue) -> Option<&Self> {
                match value {
                    PropValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

prop_data!(String, String);
prop_data!(i64, Int);
prop_data!(f64, Double);
prop_data!(bool, Bool);
prop_data!(Vec<String>, StringList);
prop_data!(Record, Record);

// ---------------------------------------------------------------------------
// PropKey
// ---------------------------------------------------------------------------

/// A typed property key. Declare once as a constant and reuse.
pub struct PropKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropData> PropKey<T> {
    /// Declare a key.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The property name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn slot(&self) -> (&'static str, PropType) {
        (self.name, T::TYPE)
    }
}

impl<T> Clone for PropKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropKey<T> {}

impl<T> fmt::Debug for PropKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropKey({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// PropertyContainer
// ---------------------------------------------------------------------------

/// Immutable `(name, type) -> value` map.
#[derive(Clone, Default)]
pub struct PropertyContainer {
    entries: Arc<BTreeMap<(&'static str, PropType), PropValue>>,
}

impl PropertyContainer {
    /// An empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new container with `key` set to `value`.
    pub fn with<T: PropData>(&self, key: PropKey<T>, value: impl Into<T>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key.slot(), value.into().into_value());
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Return a new container without `key`.
    pub fn without<T: PropData>(&self, key: PropKey<T>) -> Self {
        if !self.entries.contains_key(&key.slot()) {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.remove(&key.slot());
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Borrow the value stored under `key`, if present with the matching type.
    pub fn get_ref<T: PropData>(&self, key: PropKey<T>) -> Option<&T> {
        self.entries.get(&key.slot()).and_then(T::from_value)
    }

    /// Clone the value stored under `key`.
    pub fn get<T: PropData>(&self, key: PropKey<T>) -> Option<T> {
        self.get_ref(key).cloned()
    }

    /// Read a value, falling back to `default` when absent.
    pub fn get_or<T: PropData>(&self, key: PropKey<T>, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Convenience for string keys.
    pub fn get_str(&self, key: PropKey<String>) -> Option<&str> {
        self.get_ref(key).map(String::as_str)
    }

    /// Whether a value is stored under `key` with the matching type.
    pub fn contains<T: PropData>(&self, key: PropKey<T>) -> bool {
        self.get_ref(key).is_some()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropValue)> {
        self.entries.iter().map(|(&(name, _), value)| (name, value))
    }
}

impl PartialEq for PropertyContainer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl fmt::Debug for PropertyContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: PropKey<String> = PropKey::new("label");
    const COUNT: PropKey<i64> = PropKey::new("count");
    const COUNT_AS_TEXT: PropKey<String> = PropKey::new("count");
    const RATIO: PropKey<f64> = PropKey::new("ratio");
    const ITEMS: PropKey<Vec<String>> = PropKey::new("items");

    #[test]
    fn with_returns_new_container() {
        let empty = PropertyContainer::new();
        let labelled = empty.with(LABEL, "hello");
        assert!(empty.is_empty());
        assert_eq!(labelled.get_str(LABEL), Some("hello"));
    }

    #[test]
    fn wrong_type_reads_absent() {
        let props = PropertyContainer::new().with(COUNT, 3);
        assert_eq!(props.get(COUNT), Some(3));
        assert_eq!(props.get(COUNT_AS_TEXT), None);
    }

    #[test]
    fn same_name_different_types_coexist() {
        let props = PropertyContainer::new()
            .with(COUNT, 3)
            .with(COUNT_AS_TEXT, "three");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get(COUNT), Some(3));
        assert_eq!(props.get_str(COUNT_AS_TEXT), Some("three"));
    }

    #[test]
    fn get_or_falls_back() {
        let props = PropertyContainer::new();
        assert_eq!(props.get_or(RATIO, 0.5), 0.5);
        assert_eq!(props.with(RATIO, 0.25).get_or(RATIO, 0.5), 0.25);
    }

    #[test]
    fn without_removes_only_that_slot() {
        let props = PropertyContainer::new().with(LABEL, "x").with(COUNT, 1);
        let trimmed = props.without(LABEL);
        assert!(!trimmed.contains(LABEL));
        assert!(trimmed.contains(COUNT));
        assert!(props.contains(LABEL));
    }

    #[test]
    fn equality_is_structural() {
        let a = PropertyContainer::new().with(ITEMS, vec!["a".to_string()]);
        let b = PropertyContainer::new().with(ITEMS, vec!["a".to_string()]);
        let c = PropertyContainer::new().with(ITEMS, vec!["b".to_string()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn doubles_compare_by_bits() {
        let nan = PropertyContainer::new().with(RATIO, f64::NAN);
        assert_eq!(nan, PropertyContainer::new().with(RATIO, f64::NAN));
        assert_ne!(
            PropertyContainer::new().with(RATIO, 0.0),
            PropertyContainer::new().with(RATIO, -0.0)
        );
    }
}
