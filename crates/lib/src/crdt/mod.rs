//! Conflict-free Replicated Data Types (CRDTs) for replicated keyed data.
//!
//! This module provides the state-based, last-writer-wins CRDTs that let
//! independent replicas converge after exchanging full state snapshots in any
//! order, any number of times, without coordination.
//!
//! # Core Types
//!
//! - [`Register`] - A single last-writer-wins value ranked by `(counter, origin)`
//! - [`Map`] - A keyed collection of registers with tombstone deletes
//! - [`Entry`] - A live value or a tombstone
//! - [`ReplicaId`] - Replica identity, also the tie-break order
//!
//! # Traits
//!
//! - [`Data`] - Bound for values stored in registers
//! - [`CRDT`] - Shared export/merge shape

pub mod entry;
pub mod errors;
pub mod map;
pub mod register;
pub mod replica;
pub mod traits;

pub use entry::Entry;
pub use errors::CRDTError;
pub use map::{Map, MapState};
pub use register::{MAX_COUNTER, Register, RegisterState};
pub use replica::ReplicaId;
pub use traits::{CRDT, Data};
