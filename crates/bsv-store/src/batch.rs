use bsv_types::Cid;

use crate::error::StoreError;

/// A block in a batch that the store failed to persist.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the block in the submitted batch.
    pub index: usize,
    pub cid: Cid,
    pub error: StoreError,
}

/// Result of a batch write.
///
/// Batches are not transactions: some blocks may be durable while others
/// failed. The outcome records exactly which.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every block was persisted (trivially true for an empty batch).
    Complete(Vec<Cid>),
    /// Some blocks were persisted and some failed.
    Partial {
        stored: Vec<Cid>,
        failed: Vec<BatchFailure>,
    },
    /// No block was persisted.
    Failed(Vec<BatchFailure>),
}

impl BatchOutcome {
    /// Classify a batch from the blocks that landed and those that did not.
    pub fn from_parts(stored: Vec<Cid>, failed: Vec<BatchFailure>) -> Self {
        match (stored.is_empty(), failed.is_empty()) {
            (_, true) => Self::Complete(stored),
            (true, false) => Self::Failed(failed),
            (false, false) => Self::Partial { stored, failed },
        }
    }

    /// Identifiers of the blocks that were persisted, in batch order.
    pub fn stored(&self) -> &[Cid] {
        match self {
            Self::Complete(stored) | Self::Partial { stored, .. } => stored,
            Self::Failed(_) => &[],
        }
    }

    pub fn failed(&self) -> &[BatchFailure] {
        match self {
            Self::Complete(_) => &[],
            Self::Partial { failed, .. } | Self::Failed(failed) => failed,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn into_parts(self) -> (Vec<Cid>, Vec<BatchFailure>) {
        match self {
            Self::Complete(stored) => (stored, Vec::new()),
            Self::Partial { stored, failed } => (stored, failed),
            Self::Failed(failed) => (Vec::new(), failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsv_crypto::BlockHasher;
    use bsv_types::Codec;

    fn cid(data: &[u8]) -> Cid {
        BlockHasher::SHA2_256.cid(Codec::Raw, data)
    }

    fn failure(index: usize) -> BatchFailure {
        BatchFailure {
            index,
            cid: cid(&[index as u8]),
            error: StoreError::ReadOnly,
        }
    }

    #[test]
    fn empty_batch_is_complete() {
        let outcome = BatchOutcome::from_parts(vec![], vec![]);
        assert!(outcome.is_complete());
        assert!(outcome.stored().is_empty());
    }

    #[test]
    fn mixed_batch_is_partial() {
        let outcome = BatchOutcome::from_parts(vec![cid(b"a")], vec![failure(1)]);
        assert!(matches!(outcome, BatchOutcome::Partial { .. }));
        assert_eq!(outcome.stored().len(), 1);
        assert_eq!(outcome.failed()[0].index, 1);
    }

    #[test]
    fn all_failed_is_failed() {
        let outcome = BatchOutcome::from_parts(vec![], vec![failure(0), failure(1)]);
        assert!(matches!(outcome, BatchOutcome::Failed(_)));
        let (stored, failed) = outcome.into_parts();
        assert!(stored.is_empty());
        assert_eq!(failed.len(), 2);
    }
}
