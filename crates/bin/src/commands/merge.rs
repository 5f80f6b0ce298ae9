//! Merge command - folds peer state into the local replica.

use std::path::Path;

use crate::cli::MergeArgs;
use crate::output::OutputFormat;
use crate::store::{load_peer_state, load_replica, save_replica};

/// Run the merge command
///
/// Peers are merged in the order given. A peer file that cannot be read or
/// decoded aborts the command before anything is saved.
pub async fn run(
    file: &Path,
    replica: Option<&str>,
    args: &MergeArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut canvas = load_replica(file, replica).await?;

    let mut results = Vec::with_capacity(args.peers.len());
    for peer in &args.peers {
        let state = load_peer_state(peer).await.map_err(|e| {
            tracing::error!(peer = %peer.display(), "Failed to load peer state: {e}");
            e
        })?;
        let changed = canvas.merge(&state);
        tracing::info!(peer = %peer.display(), keys = state.len(), changed, "Merged peer state");
        results.push((peer.display().to_string(), changed));
    }

    save_replica(file, &canvas).await?;
    let total: usize = results.iter().map(|(_, changed)| changed).sum();

    match format {
        OutputFormat::Human => {
            for (peer, changed) in &results {
                println!("{peer}: {changed} pixel(s) changed");
            }
            println!("Merged {} peer(s), {total} pixel(s) changed", results.len());
        }
        OutputFormat::Json => {
            let peers: Vec<_> = results
                .iter()
                .map(|(peer, changed)| serde_json::json!({ "peer": peer, "changed": changed }))
                .collect();
            let value = serde_json::json!({ "peers": peers, "changed": total });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
