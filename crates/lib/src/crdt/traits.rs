//! Core traits for the state-based CRDTs in this crate.
//!
//! - `Data`: the bound on values that can be stored and shipped between replicas
//! - `CRDT`: the shared export/merge shape of [`Register`](super::Register) and [`Map`](super::Map)

use serde::{Serialize, de::DeserializeOwned};

/// Marker trait for values that can live in a register and travel between replicas.
///
/// Every value must be cloneable (merges copy remote state) and serializable
/// (the exported state is the unit exchanged between replicas). The trait is
/// implemented for every type meeting those bounds.
pub trait Data: Clone + Serialize + DeserializeOwned {}

impl<T> Data for T where T: Clone + Serialize + DeserializeOwned {}

/// A state-based Conflict-free Replicated Data Type.
///
/// Replicas exchange [`State`](CRDT::State) snapshots and fold them in with
/// [`merge`](CRDT::merge). The application reads the resolved
/// [`Value`](CRDT::Value), which hides bookkeeping such as origins, counters
/// and tombstones. For every implementation the merge must be:
/// - **Commutative**: merging `a` then `b` equals merging `b` then `a`
/// - **Associative**: grouping of merges does not affect the result
/// - **Idempotent**: merging the same state again is a no-op
///
/// Together these guarantee that replicas which have seen the same set of
/// states converge, whatever the delivery order or duplication.
///
/// # Examples
///
/// ```
/// use pixelsync::crdt::{CRDT, Map};
///
/// let mut a: Map<String> = Map::new("A");
/// let mut b: Map<String> = Map::new("B");
/// a.set("k", "from a".to_string());
/// b.set("k", "from b".to_string());
///
/// let from_a = CRDT::state(&a);
/// let from_b = CRDT::state(&b);
/// assert!(CRDT::merge(&mut a, &from_b));
/// assert!(CRDT::merge(&mut b, &from_a));
/// assert_eq!(a.state(), b.state());
/// assert_eq!(CRDT::value(&a), CRDT::value(&b));
/// ```
pub trait CRDT {
    /// The resolved view presented to the application.
    type Value;

    /// The exportable state exchanged between replicas.
    type State: Clone;

    /// The currently resolved value.
    fn value(&self) -> Self::Value;

    /// Export the full state of this replica.
    fn state(&self) -> Self::State;

    /// Fold a remote state into this replica.
    ///
    /// Returns `true` if any local state changed.
    fn merge(&mut self, remote: &Self::State) -> bool;
}
