use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The identifier could not be decoded or constructed.
    #[error("malformed cid: {0}")]
    Cid(#[from] cid::Error),

    #[error("invalid digest length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("empty digest")]
    EmptyDigest,

    #[error("unknown hash function: {0}")]
    UnknownHash(String),

    #[error("unknown codec: {0}")]
    UnknownCodec(String),

    #[error("block payload is empty")]
    EmptyPayload,
}
