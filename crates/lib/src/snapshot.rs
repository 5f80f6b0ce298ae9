//! Persisted replica snapshots.
//!
//! A [`Snapshot`] pairs a replica id with its exported [`MapState`] so that a
//! replica can be stopped and restarted from disk, or seeded from a state
//! received over the wire. Snapshots are plain JSON:
//!
//! ```json
//! { "replica": "A", "state": { "0,0": ["A", 1, [[255, 0, 0]]] } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    Result,
    crdt::{CRDTError, Data, Map, MapState, ReplicaId},
    pixel::{PixelData, Rgb},
};

/// The current snapshot format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const SNAPSHOT_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the snapshot version during deserialization.
fn validate_snapshot_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != SNAPSHOT_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported snapshot version {version}; only version {SNAPSHOT_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// A replica id together with its full map state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<V> {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_snapshot_version"
    )]
    version: u8,
    /// Replica the state belongs to
    pub replica: ReplicaId,
    /// Exported map state, tombstones included
    pub state: MapState<V>,
}

impl<V> Snapshot<V> {
    pub fn new(replica: impl Into<ReplicaId>, state: MapState<V>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            replica: replica.into(),
            state,
        }
    }

    /// Rebuild the map this snapshot was taken from.
    pub fn into_map(self) -> Map<V> {
        Map::from_state(self.replica, self.state)
    }
}

impl Snapshot<Rgb> {
    /// Rebuild a pixel canvas from this snapshot.
    pub fn into_pixels(self) -> PixelData {
        PixelData::from_state(self.replica, self.state)
    }
}

impl<V: Data> Snapshot<V> {
    /// Encode as pretty-printed JSON for storage.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CRDTError::SerializationFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Decode a stored snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CRDTError::DeserializationFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl<V: Data> Map<V> {
    /// Capture this map as a snapshot.
    pub fn snapshot(&self) -> Snapshot<V> {
        Snapshot::new(self.replica().clone(), self.state())
    }
}

impl PixelData {
    /// Capture this canvas as a snapshot.
    pub fn snapshot(&self) -> Snapshot<Rgb> {
        Snapshot::new(self.replica().clone(), self.state())
    }
}
