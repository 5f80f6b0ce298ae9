//! Read-only commands: get, show, export.

use std::path::Path;

use crate::cli::PixelArgs;
use crate::output::{OutputFormat, pixel_table};
use crate::store::load_replica;

/// Run the get command
pub async fn run_get(
    file: &Path,
    args: &PixelArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = load_replica(file, None).await?;
    let color = canvas.get(args.x, args.y);
    let painted = canvas.has(args.x, args.y);

    match format {
        OutputFormat::Human if painted => println!("{color}"),
        OutputFormat::Human => println!("{color} (unpainted)"),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "x": args.x,
                "y": args.y,
                "color": color,
                "painted": painted,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the show command
pub async fn run_show(file: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = load_replica(file, None).await?;
    let pixels = canvas.pixels();

    match format {
        OutputFormat::Human => {
            println!("Replica:   {}", canvas.replica());
            println!("Painted:   {}", pixels.len());
            println!("Keys:      {}", canvas.state().len());
            let table = pixel_table(&pixels);
            if !table.is_empty() {
                println!();
                for line in table {
                    println!("{line}");
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = pixels
                .iter()
                .map(|((x, y), color)| serde_json::json!({ "x": x, "y": y, "color": color }))
                .collect();
            let value = serde_json::json!({
                "replica": canvas.replica(),
                "pixels": rows,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the export command
///
/// Always prints the bare state as JSON, the form peers feed to `merge`.
pub async fn run_export(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = load_replica(file, None).await?;
    println!("{}", canvas.state().to_json()?);
    Ok(())
}
