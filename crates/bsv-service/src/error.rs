use thiserror::Error;

use bsv_exchange::ExchangeError;
use bsv_store::{BatchFailure, StoreError};
use bsv_types::Cid;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed identifier or block. Raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Absent from the local store and not resolvable through the exchange.
    ///
    /// When an exchange was consulted and failed, its error is kept as the
    /// source so "never existed" and "unreachable" stay distinguishable.
    #[error("block not found: {cid}")]
    NotFound {
        cid: Cid,
        #[source]
        cause: Option<ExchangeError>,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Some or all blocks of a batch could not be persisted.
    #[error("batch write incomplete: {} stored, {} failed", .stored.len(), .failed.len())]
    Batch {
        stored: Vec<Cid>,
        failed: Vec<BatchFailure>,
    },

    /// A payload did not match the identifier it was offered under.
    #[error("integrity violation for {cid}: {reason}")]
    Integrity { cid: Cid, reason: String },
}

impl ServiceError {
    /// `true` for the retrievable-absence class, whatever the cause.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The exchange failure behind a `NotFound`, if one was consulted.
    pub fn exchange_cause(&self) -> Option<&ExchangeError> {
        match self {
            Self::NotFound { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }

    /// For `Batch` errors: `true` if at least one block was persisted.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Batch { stored, .. } if !stored.is_empty())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bsv_crypto::BlockHasher;
    use bsv_types::Codec;
    use std::error::Error as _;

    fn cid() -> Cid {
        BlockHasher::SHA2_256.cid(Codec::Raw, b"x")
    }

    #[test]
    fn not_found_keeps_exchange_cause() {
        let err = ServiceError::NotFound {
            cid: cid(),
            cause: Some(ExchangeError::Transport("peer hung up".into())),
        };
        assert!(err.is_not_found());
        assert!(matches!(err.exchange_cause(), Some(ExchangeError::Transport(_))));
        assert!(err.source().is_some());
    }

    #[test]
    fn offline_not_found_has_no_source() {
        let err = ServiceError::NotFound {
            cid: cid(),
            cause: None,
        };
        assert!(err.source().is_none());
        assert!(err.to_string().starts_with("block not found: bafkrei"));
    }

    #[test]
    fn batch_message_counts() {
        let err = ServiceError::Batch {
            stored: vec![cid()],
            failed: vec![BatchFailure {
                index: 1,
                cid: cid(),
                error: StoreError::ReadOnly,
            }],
        };
        assert_eq!(err.to_string(), "batch write incomplete: 1 stored, 1 failed");
        assert!(err.is_partial());
    }
}
