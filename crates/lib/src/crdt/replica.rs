//! Replica identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of one replica.
///
/// Replica ids stamp every local write and break ties between writes that
/// carry the same logical counter. The ordering is plain lexicographic byte
/// order of the underlying string, so every replica computes the same winner.
///
/// # Examples
///
/// ```
/// use pixelsync::crdt::ReplicaId;
///
/// let a = ReplicaId::from("A");
/// let b = ReplicaId::from("B");
/// assert!(b > a);
/// assert_eq!(a.as_str(), "A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaId(String);

impl ReplicaId {
    /// Create a replica id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReplicaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ReplicaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ReplicaId> for ReplicaId {
    fn from(id: &ReplicaId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for ReplicaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
