//!
//! pixelsync: state-based CRDTs for replicated sparse keyed data.
//!
//! Independent replicas edit their own copy of a keyed dataset, ship their full
//! state to peers by any means, and merge whatever they receive, in any order
//! and any number of times. Every replica that has seen the same writes ends
//! up with identical state, without clocks or coordination.
//!
//! ## Core Concepts
//!
//! * **Registers (`crdt::Register`)**: A single last-writer-wins value stamped with its origin replica and a logical counter.
//! * **Maps (`crdt::Map`)**: A keyed collection of registers. Deletes are stored as tombstones so they propagate.
//! * **State (`crdt::MapState`)**: The full per-key register state, the unit exchanged between replicas.
//! * **Pixels (`pixel::PixelData`)**: A pixel canvas keyed by `"x,y"` coordinates, built on a map of RGB colors.
//! * **Snapshots (`snapshot::Snapshot`)**: A replica id plus its state, for persisting and restarting replicas.
//!
//! The core is synchronous and performs no I/O. Callers that share one map
//! between threads must serialize access themselves.

pub mod crdt;
pub mod pixel;
pub mod snapshot;

pub use crdt::{Map, ReplicaId};
pub use pixel::{PixelData, Rgb};
pub use snapshot::Snapshot;

/// Result type used throughout the pixelsync library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the pixelsync library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured CRDT errors from the crdt module
    #[error(transparent)]
    CRDT(crdt::CRDTError),

    /// Structured pixel errors from the pixel module
    #[error(transparent)]
    Pixel(pixel::PixelError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::CRDT(_) => "crdt",
            Error::Pixel(_) => "pixel",
            Error::Io(_) => "io",
        }
    }

    /// Check if this error indicates a missing file or resource.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io(io_err) => io_err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is CRDT-related.
    pub fn is_crdt_error(&self) -> bool {
        matches!(self, Error::CRDT(_))
    }

    /// Check if this error came from rejecting malformed replica state.
    pub fn is_malformed_state(&self) -> bool {
        match self {
            Error::CRDT(crdt_err) => crdt_err.is_malformed_state(),
            _ => false,
        }
    }

    /// Check if this error is a pixel parse failure.
    pub fn is_pixel_error(&self) -> bool {
        matches!(self, Error::Pixel(_))
    }
}
