//! Error types for CRDT operations.
//!
//! Steady-state CRDT operations never fail. These errors only arise at the
//! boundary, when state is encoded for transmission or decoded from a peer.

use thiserror::Error;

/// Structured error types for CRDT state encoding and decoding.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CRDTError {
    /// Serialization of CRDT state failed
    #[error("CRDT serialization failed: {reason}")]
    SerializationFailed { reason: String },

    /// Deserialization of CRDT state failed, e.g. a malformed register triple
    #[error("CRDT deserialization failed: {reason}")]
    DeserializationFailed { reason: String },
}

impl CRDTError {
    /// Check if this error came from rejecting malformed incoming state
    pub fn is_malformed_state(&self) -> bool {
        matches!(self, CRDTError::DeserializationFailed { .. })
    }
}

// Conversion from CRDTError to the main Error type
impl From<CRDTError> for crate::Error {
    fn from(err: CRDTError) -> Self {
        crate::Error::CRDT(err)
    }
}
