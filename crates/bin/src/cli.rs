//! CLI argument definitions for the pixelsync binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pixelsync::Rgb;

/// Replicated pixel canvas, one replica per snapshot file
#[derive(Parser, Debug)]
#[command(name = "pixelsync")]
#[command(about = "pixelsync: paint on a replicated canvas and merge with peers")]
#[command(version)]
pub struct Cli {
    /// Replica snapshot file
    #[arg(
        short,
        long,
        global = true,
        default_value = "pixelsync.json",
        env = "PIXELSYNC_FILE"
    )]
    pub file: PathBuf,

    /// Replica id, used when the snapshot file does not exist yet
    #[arg(short, long, global = true, env = "PIXELSYNC_REPLICA")]
    pub replica: Option<String>,

    /// Print JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty replica file
    Init,
    /// Paint a pixel
    Set(SetArgs),
    /// Read a pixel's color
    Get(PixelArgs),
    /// Erase a pixel
    Delete(PixelArgs),
    /// Merge the state of one or more peer files into this replica
    Merge(MergeArgs),
    /// Print this replica's full state for shipping to peers
    Export,
    /// List painted pixels
    Show,
}

/// Coordinates of a single pixel
#[derive(clap::Args, Debug)]
pub struct PixelArgs {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
    /// Color as `#rrggbb` or `r,g,b`
    pub color: Rgb,
}

/// Arguments for the merge command
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Peer snapshot or exported state files, merged in the given order
    #[arg(required = true, num_args = 1..)]
    pub peers: Vec<PathBuf>,
}
