//! Last-writer-wins register.
//!
//! A [`Register`] holds a single value together with the identity of the
//! replica that wrote it and a logical counter. Two register states are
//! ordered by `(counter, origin)`: the higher counter wins, and equal counters
//! fall back to the greater origin id. Since this is a total order over
//! states, every replica that has seen the same writes picks the same winner.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, trace};

use super::{CRDT, ReplicaId};

/// The highest counter a register state may carry.
///
/// A register at this counter can no longer record a local write, since the
/// next write would need a counter beyond it.
pub const MAX_COUNTER: u64 = u64::MAX - 1;

/// The exportable state of a register: `(origin, counter, value)`.
///
/// Encoded on the wire as a three element array, e.g. `["A", 1, [255, 0, 0]]`.
/// Decoding rejects arrays of any other length, non-string origins, and
/// negative, fractional or out-of-range counters (above [`MAX_COUNTER`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegisterState<T> {
    /// Replica that authored the current value
    pub origin: ReplicaId,
    /// Logical write counter
    pub counter: u64,
    /// The value itself
    pub value: T,
}

impl<T> RegisterState<T> {
    pub fn new(origin: impl Into<ReplicaId>, counter: u64, value: T) -> Self {
        Self {
            origin: origin.into(),
            counter,
            value,
        }
    }

    /// The conflict-resolution rank of this state.
    ///
    /// Tuples compare lexicographically, so the counter dominates and the
    /// origin id only breaks ties.
    pub fn rank(&self) -> (u64, &ReplicaId) {
        (self.counter, &self.origin)
    }

    /// Returns true if this state wins over `other`.
    ///
    /// A state never wins against itself, so re-merging is a no-op.
    pub fn dominates(&self, other: &RegisterState<T>) -> bool {
        self.rank() > other.rank()
    }
}

impl<T: Serialize> Serialize for RegisterState<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.origin, self.counter, &self.value).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RegisterState<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (origin, counter, value) = <(ReplicaId, u64, T)>::deserialize(deserializer)?;
        if counter > MAX_COUNTER {
            return Err(serde::de::Error::custom(format!(
                "register counter {counter} exceeds the maximum of {MAX_COUNTER}"
            )));
        }
        Ok(Self {
            origin,
            counter,
            value,
        })
    }
}

/// A last-writer-wins register owned by one replica.
///
/// The owning replica id is only used to stamp local writes; the current
/// value may well have been authored elsewhere and adopted through
/// [`merge`](Register::merge).
///
/// # Examples
///
/// ```
/// use pixelsync::crdt::{Register, RegisterState};
///
/// let mut register = Register::new("A", "red");
/// assert_eq!(register.state(), &RegisterState::new("A", 1, "red"));
///
/// // Same counter, greater origin: the remote write wins
/// assert!(register.merge(&RegisterState::new("B", 1, "blue")));
/// assert_eq!(*register.value(), "blue");
///
/// // Local writes always win locally
/// register.set("green");
/// assert_eq!(register.state(), &RegisterState::new("A", 2, "green"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register<T> {
    replica: ReplicaId,
    state: RegisterState<T>,
}

impl<T> Register<T> {
    /// Create a register for a fresh local write, seeded at counter 1.
    pub fn new(replica: impl Into<ReplicaId>, value: T) -> Self {
        let replica = replica.into();
        let state = RegisterState::new(replica.clone(), 1, value);
        Self { replica, state }
    }

    /// Create a register that adopts an existing state verbatim.
    ///
    /// Origin and counter are kept as they are; nothing is re-stamped with
    /// the owning replica id.
    pub fn from_state(replica: impl Into<ReplicaId>, state: RegisterState<T>) -> Self {
        Self {
            replica: replica.into(),
            state,
        }
    }

    /// The replica that owns this register instance.
    pub fn replica(&self) -> &ReplicaId {
        &self.replica
    }

    /// The currently resolved value.
    pub fn value(&self) -> &T {
        &self.state.value
    }

    /// The full `(origin, counter, value)` state.
    pub fn state(&self) -> &RegisterState<T> {
        &self.state
    }

    /// Consume the register, returning its state.
    pub fn into_state(self) -> RegisterState<T> {
        self.state
    }

    /// Write a value locally.
    ///
    /// The new state is `(replica, counter + 1, value)`, which ranks above
    /// everything this register has seen so far.
    ///
    /// A register whose counter has reached [`MAX_COUNTER`] cannot rank a new
    /// write above its current state. The write is then dropped and logged as
    /// an error, leaving the state untouched so replicas stay converged.
    pub fn set(&mut self, value: T) {
        if self.state.counter >= MAX_COUNTER {
            error!(
                replica = %self.replica,
                origin = %self.state.origin,
                counter = self.state.counter,
                "Register counter exhausted, dropping local write"
            );
            return;
        }
        self.state = RegisterState {
            origin: self.replica.clone(),
            counter: self.state.counter + 1,
            value,
        };
    }
}

impl<T: Clone> Register<T> {
    /// Reconcile with a remote register state.
    ///
    /// The remote state is adopted wholesale (origin, counter and value) if it
    /// ranks strictly higher than the local one, and discarded otherwise.
    /// Returns `true` if the remote state was adopted.
    pub fn merge(&mut self, remote: &RegisterState<T>) -> bool {
        if !remote.dominates(&self.state) {
            trace!(
                local_origin = %self.state.origin,
                local_counter = self.state.counter,
                remote_origin = %remote.origin,
                remote_counter = remote.counter,
                "Discarding remote register state"
            );
            return false;
        }
        self.state = remote.clone();
        true
    }
}

impl<T: Clone> CRDT for Register<T> {
    type Value = T;
    type State = RegisterState<T>;

    fn value(&self) -> Self::Value {
        self.state.value.clone()
    }

    fn state(&self) -> Self::State {
        self.state.clone()
    }

    fn merge(&mut self, remote: &Self::State) -> bool {
        Register::merge(self, remote)
    }
}
