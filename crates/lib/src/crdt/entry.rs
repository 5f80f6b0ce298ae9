//! Tombstone-aware register values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The value held by a register inside a [`Map`](crate::crdt::Map).
///
/// Deletion is a first-class value: a deleted key keeps its register and
/// stores [`Entry::Tombstone`], which takes part in last-writer-wins ordering
/// like any other write. This is what lets a delete propagate to peers.
///
/// On the wire a tombstone is encoded as `null` and a live value as a
/// one-element array `[value]`. The wrapper keeps live values whose own
/// encoding is `null` (such as `()` or `Option<T>`) distinct from tombstones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entry<V> {
    /// A live value.
    Value(V),
    /// Deletion marker.
    Tombstone,
}

impl<V> Entry<V> {
    /// Returns true if this entry marks a deletion.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Entry::Tombstone)
    }

    /// Borrow the live value, if any.
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Tombstone => None,
        }
    }

    /// Consume the entry, returning the live value if any.
    pub fn into_value(self) -> Option<V> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Tombstone => None,
        }
    }
}

impl<V> From<Option<V>> for Entry<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(value) => Entry::Value(value),
            None => Entry::Tombstone,
        }
    }
}

impl<V> From<Entry<V>> for Option<V> {
    fn from(entry: Entry<V>) -> Self {
        entry.into_value()
    }
}

impl<V: Serialize> Serialize for Entry<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Entry::Value(value) => serializer.serialize_some(&(value,)),
            Entry::Tombstone => serializer.serialize_none(),
        }
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entry<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<(V,)>::deserialize(deserializer).map(|wrapped| match wrapped {
            Some((value,)) => Entry::Value(value),
            None => Entry::Tombstone,
        })
    }
}
