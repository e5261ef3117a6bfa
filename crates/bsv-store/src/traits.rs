use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use bsv_types::{Block, Cid};

use crate::batch::{BatchFailure, BatchOutcome};
use crate::error::StoreResult;

/// Content-addressed block store.
///
/// All implementations must satisfy these invariants:
/// - Entries are keyed by the multihash of the identifier.
/// - Writes are idempotent; rewriting an existing key is a no-op.
/// - `delete` of an absent key succeeds and returns `false`.
/// - The store never interprets payloads and never verifies hashes.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Check whether a block exists.
    async fn has(&self, cid: &Cid) -> StoreResult<bool>;

    /// Read a block's payload.
    ///
    /// Returns `Ok(None)` if the block does not exist.
    /// Returns `Err` on I/O failure.
    async fn get(&self, cid: &Cid) -> StoreResult<Option<Bytes>>;

    /// Persist a block. Returns once the backend reports it durable.
    async fn put(&self, block: &Block) -> StoreResult<()>;

    /// Delete a block. Returns `true` if it existed.
    async fn delete(&self, cid: &Cid) -> StoreResult<bool>;

    /// Persist several blocks, reporting which ones landed.
    ///
    /// Default implementation calls `put()` for each block in order. Backends
    /// may override for better throughput (e.g., one trip to a worker thread).
    async fn put_many(&self, blocks: &[Block]) -> StoreResult<BatchOutcome> {
        let mut stored = Vec::with_capacity(blocks.len());
        let mut failed = Vec::new();
        for (index, block) in blocks.iter().enumerate() {
            match self.put(block).await {
                Ok(()) => stored.push(block.cid().clone()),
                Err(error) => failed.push(BatchFailure {
                    index,
                    cid: block.cid().clone(),
                    error,
                }),
            }
        }
        Ok(BatchOutcome::from_parts(stored, failed))
    }
}

#[async_trait]
impl<S: BlockStore + ?Sized> BlockStore for Arc<S> {
    async fn has(&self, cid: &Cid) -> StoreResult<bool> {
        (**self).has(cid).await
    }

    async fn get(&self, cid: &Cid) -> StoreResult<Option<Bytes>> {
        (**self).get(cid).await
    }

    async fn put(&self, block: &Block) -> StoreResult<()> {
        (**self).put(block).await
    }

    async fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        (**self).delete(cid).await
    }

    async fn put_many(&self, blocks: &[Block]) -> StoreResult<BatchOutcome> {
        (**self).put_many(blocks).await
    }
}
