//! Error types for event serialization and integrity checks.

use crate::event::EventKind;

/// Errors that can occur around event records.
///
/// Canonical encoding itself is total and never produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// JSON serialization or deserialization failed.
    #[error("log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored integrity hash does not match the event content.
    #[error("{kind} event integrity mismatch: stored {stored:016x}, computed {computed:016x}")]
    IntegrityMismatch {
        kind: EventKind,
        stored: u64,
        computed: u64,
    },

    /// Verification was requested on an event that was never sealed.
    #[error("{0} event carries no integrity hash")]
    Unsealed(EventKind),
}
