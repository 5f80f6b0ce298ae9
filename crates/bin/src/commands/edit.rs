//! Local edits: init, set, delete.

use std::path::Path;

use pixelsync::PixelData;

use crate::cli::{PixelArgs, SetArgs};
use crate::output::OutputFormat;
use crate::store::{load_replica, save_replica};

/// Run the init command
pub async fn run_init(
    file: &Path,
    replica: Option<&str>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(replica) = replica else {
        return Err("init requires --replica (or PIXELSYNC_REPLICA)".into());
    };
    if tokio::fs::try_exists(file).await? {
        return Err(format!("{} already exists", file.display()).into());
    }

    let canvas = PixelData::new(replica);
    save_replica(file, &canvas).await?;
    tracing::info!(file = %file.display(), replica, "Initialized replica");

    match format {
        OutputFormat::Human => println!("Initialized replica {replica} in {}", file.display()),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "replica": replica,
                "file": file.display().to_string(),
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the set command
pub async fn run_set(
    file: &Path,
    replica: Option<&str>,
    args: &SetArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut canvas = load_replica(file, replica).await?;
    canvas.set(args.x, args.y, args.color);
    save_replica(file, &canvas).await?;

    report_write(&canvas, args.x, args.y, format)
}

/// Run the delete command
pub async fn run_delete(
    file: &Path,
    replica: Option<&str>,
    args: &PixelArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut canvas = load_replica(file, replica).await?;
    canvas.delete(args.x, args.y);
    save_replica(file, &canvas).await?;

    report_write(&canvas, args.x, args.y, format)
}

fn report_write(
    canvas: &PixelData,
    x: u32,
    y: u32,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = PixelData::key(x, y);
    let Some(register) = canvas.map().register(&key) else {
        // Deleting a pixel this replica never saw leaves nothing behind
        match format {
            OutputFormat::Human => println!("{key}: never painted, nothing to erase"),
            OutputFormat::Json => println!("{}", serde_json::json!({ "key": key, "state": null })),
        }
        return Ok(());
    };

    match format {
        OutputFormat::Human => {
            let state = register.state();
            let shown = match state.value.as_value() {
                Some(color) => color.to_string(),
                None => "erased".to_string(),
            };
            println!("{key}: {shown} (origin {}, counter {})", state.origin, state.counter);
        }
        OutputFormat::Json => {
            let value = serde_json::json!({ "key": key, "state": register.state() });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
