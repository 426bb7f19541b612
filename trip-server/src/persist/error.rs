//! Persistence error types.

/// Errors from a trip persistence collaborator.
///
/// A failed save never clears the trip's unsaved-changes state, so every
/// variant is safe to surface to the user and retry manually.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The save endpoint rejected the request
    #[error("save endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to encode or decode the persisted record
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Filesystem operation failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The store refused the save (used by the in-memory store)
    #[error("save rejected: {0}")]
    Rejected(String),
}
