use std::path::PathBuf;

/// Errors from block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// Attempted to write a block under the null identifier.
    #[error("cannot store block with null key")]
    NullKey,

    /// A stored entry exists but cannot be a valid block.
    #[error("corrupt entry {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// The configured root exists but is not a directory.
    #[error("store root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Backend-specific failure that is not an I/O error.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
