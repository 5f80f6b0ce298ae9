//! A keyed collection of last-writer-wins registers.
//!
//! [`Map`] owns one [`Register`] per key ever observed. Local writes go through
//! the register for that key, deletes store a tombstone, and merges fold a
//! remote [`MapState`] in key by key. All conflict resolution happens inside
//! the registers; the map only routes.

use std::collections::{BTreeMap, HashMap, hash_map};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{CRDT, CRDTError, Entry, Register, RegisterState, ReplicaId};
use crate::Result;

/// The exportable state of a [`Map`]: every key with its full register state.
///
/// Tombstones are included so deletions propagate. Keys missing from a state
/// are simply unknown to the sender, which is different from a tombstoned key.
///
/// Encoded as a JSON object of register triples, each live value wrapped in a
/// one-element array and each tombstone as `null`:
///
/// ```json
/// { "0,0": ["A", 1, [[255, 0, 0]]], "1,1": ["B", 2, null] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapState<V> {
    registers: BTreeMap<String, RegisterState<Entry<V>>>,
}

impl<V> MapState<V> {
    /// Create an empty state.
    pub fn new() -> Self {
        Self {
            registers: BTreeMap::new(),
        }
    }

    /// Number of keys, tombstones included.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.registers.contains_key(key)
    }

    /// Get the register state for a key.
    pub fn get(&self, key: &str) -> Option<&RegisterState<Entry<V>>> {
        self.registers.get(key)
    }

    /// Insert a register state, returning the previous one for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        state: RegisterState<Entry<V>>,
    ) -> Option<RegisterState<Entry<V>>> {
        self.registers.insert(key.into(), state)
    }

    /// Iterate over keys and register states in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisterState<Entry<V>>)> {
        self.registers.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.registers.keys()
    }
}

impl<V: Serialize> MapState<V> {
    /// Encode this state as JSON for transmission.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            CRDTError::SerializationFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl<V: DeserializeOwned> MapState<V> {
    /// Decode a state received from a peer.
    ///
    /// Malformed register triples are rejected here, so that
    /// [`Map::merge`] never has to deal with them.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CRDTError::DeserializationFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl<V> Default for MapState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, RegisterState<Entry<V>>)> for MapState<V> {
    fn from_iter<I: IntoIterator<Item = (String, RegisterState<Entry<V>>)>>(iter: I) -> Self {
        Self {
            registers: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for MapState<V> {
    type Item = (String, RegisterState<Entry<V>>);
    type IntoIter = std::collections::btree_map::IntoIter<String, RegisterState<Entry<V>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.registers.into_iter()
    }
}

impl<V> From<BTreeMap<String, RegisterState<Entry<V>>>> for MapState<V> {
    fn from(registers: BTreeMap<String, RegisterState<Entry<V>>>) -> Self {
        Self { registers }
    }
}

/// A last-writer-wins map from string keys to values.
///
/// # Examples
///
/// ```
/// use pixelsync::crdt::Map;
///
/// let mut a: Map<[u8; 3]> = Map::new("A");
/// let mut b: Map<[u8; 3]> = Map::new("B");
///
/// a.set("0,0", [255, 0, 0]);
/// b.set("0,0", [0, 0, 255]);
///
/// let from_a = a.state();
/// let from_b = b.state();
/// a.merge(&from_b);
/// b.merge(&from_a);
///
/// // Equal counters, "B" > "A": blue wins everywhere
/// assert_eq!(a.get("0,0"), Some(&[0, 0, 255]));
/// assert_eq!(a.state(), b.state());
/// ```
#[derive(Debug, Clone)]
pub struct Map<V> {
    replica: ReplicaId,
    registers: HashMap<String, Register<Entry<V>>>,
}

impl<V> Map<V> {
    /// Create an empty map owned by `replica`.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        Self {
            replica: replica.into(),
            registers: HashMap::new(),
        }
    }

    /// Rebuild a map from a previously exported state.
    ///
    /// Every register adopts its state verbatim, so a replica restarted from
    /// its own export continues exactly where it left off.
    pub fn from_state(replica: impl Into<ReplicaId>, state: MapState<V>) -> Self {
        let replica = replica.into();
        let registers = state
            .into_iter()
            .map(|(key, register)| (key, Register::from_state(replica.clone(), register)))
            .collect();
        Self { replica, registers }
    }

    /// The replica that owns this map.
    pub fn replica(&self) -> &ReplicaId {
        &self.replica
    }

    /// Returns true if `key` holds a live value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get the live value for `key`, hiding tombstones.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.registers.get(key).and_then(|r| r.value().as_value())
    }

    /// Get the register backing `key`, tombstoned or not.
    pub fn register(&self, key: &str) -> Option<&Register<Entry<V>>> {
        self.registers.get(key)
    }

    /// Iterate over live keys and values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.registers
            .iter()
            .filter_map(|(key, r)| r.value().as_value().map(|v| (key.as_str(), v)))
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write a value locally.
    ///
    /// A key seen for the first time starts its own counter lineage at
    /// `(replica, 1, value)`.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        match self.registers.entry(key.into()) {
            hash_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().set(Entry::Value(value));
            }
            hash_map::Entry::Vacant(vacant) => {
                debug!(replica = %self.replica, key = %vacant.key(), "Creating register for local write");
                vacant.insert(Register::new(self.replica.clone(), Entry::Value(value)));
            }
        }
    }

    /// Tombstone `key`.
    ///
    /// Deleting a key this replica has never seen does nothing, since there
    /// is no register to tombstone.
    pub fn delete(&mut self, key: &str) {
        if let Some(register) = self.registers.get_mut(key) {
            register.set(Entry::Tombstone);
        }
    }
}

impl<V: Clone> Map<V> {
    /// A copy of every live key and value, tombstones hidden.
    pub fn value(&self) -> BTreeMap<String, V> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    /// Export the full state, tombstones included.
    pub fn state(&self) -> MapState<V> {
        self.registers
            .iter()
            .map(|(key, register)| (key.clone(), register.state().clone()))
            .collect()
    }

    /// Fold a remote state into this map.
    ///
    /// Keys already known are merged into their register; unknown keys adopt
    /// the remote register state verbatim, keeping the remote origin and
    /// counter. Keys absent from `remote` are left untouched.
    ///
    /// Returns the number of keys whose state changed.
    pub fn merge(&mut self, remote: &MapState<V>) -> usize {
        let mut changed = 0;
        for (key, incoming) in remote.iter() {
            match self.registers.get_mut(key) {
                Some(local) => {
                    if local.merge(incoming) {
                        changed += 1;
                    }
                }
                None => {
                    debug!(
                        replica = %self.replica,
                        key = %key,
                        origin = %incoming.origin,
                        counter = incoming.counter,
                        "Adopting register for unseen key"
                    );
                    self.registers.insert(
                        key.clone(),
                        Register::from_state(self.replica.clone(), incoming.clone()),
                    );
                    changed += 1;
                }
            }
        }
        debug!(
            replica = %self.replica,
            incoming = remote.len(),
            changed,
            "Merged remote state"
        );
        changed
    }
}

impl<V: Clone> CRDT for Map<V> {
    type Value = BTreeMap<String, V>;
    type State = MapState<V>;

    fn value(&self) -> Self::Value {
        Map::value(self)
    }

    fn state(&self) -> Self::State {
        Map::state(self)
    }

    fn merge(&mut self, remote: &Self::State) -> bool {
        Map::merge(self, remote) > 0
    }
}
