//! Replica file loading and saving.
//!
//! A replica lives in a single JSON snapshot file. Peer files handed to
//! `merge` may be either full snapshots or bare exported states.

use std::path::Path;

use pixelsync::{
    PixelData, Result, Rgb, Snapshot,
    crdt::{MapState, ReplicaId},
};

/// Load the replica stored at `path`.
///
/// If the file does not exist and a replica id was given, a fresh empty
/// replica is returned instead; it is only written once the caller saves.
pub async fn load_replica(path: &Path, replica: Option<&str>) -> Result<PixelData> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let snapshot = Snapshot::<Rgb>::from_json(&json)?;
            if let Some(requested) = replica {
                if snapshot.replica.as_str() != requested {
                    tracing::warn!(
                        file = %path.display(),
                        owner = %snapshot.replica,
                        requested,
                        "Ignoring replica id; file belongs to another replica"
                    );
                }
            }
            tracing::info!(file = %path.display(), replica = %snapshot.replica, "Loaded replica");
            Ok(snapshot.into_pixels())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => match replica {
            Some(id) => {
                tracing::warn!(file = %path.display(), replica = id, "Replica file not found, starting empty replica");
                Ok(PixelData::new(ReplicaId::from(id)))
            }
            None => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    }
}

/// Write the replica snapshot to `path`.
pub async fn save_replica(path: &Path, canvas: &PixelData) -> Result<()> {
    let json = canvas.snapshot().to_json()?;
    tokio::fs::write(path, json).await?;
    tracing::info!(file = %path.display(), replica = %canvas.replica(), "Saved replica");
    Ok(())
}

/// Returns true if `json` has the shape of a snapshot rather than a bare state.
///
/// Snapshots carry a string `replica` field. Bare state values are register
/// triples, so a bare state never matches.
fn looks_like_snapshot(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|value| value.get("replica").map(serde_json::Value::is_string))
        .unwrap_or(false)
}

/// Load the state carried by a peer file, snapshot or bare state.
///
/// The file is decoded as whichever format its shape indicates, so a decode
/// failure reports the problem with that format.
pub async fn load_peer_state(path: &Path) -> Result<MapState<Rgb>> {
    let json = tokio::fs::read_to_string(path).await?;
    if looks_like_snapshot(&json) {
        tracing::debug!(file = %path.display(), "Decoding peer file as snapshot");
        Ok(Snapshot::<Rgb>::from_json(&json)?.state)
    } else {
        tracing::debug!(file = %path.display(), "Decoding peer file as bare state");
        MapState::from_json(&json)
    }
}
