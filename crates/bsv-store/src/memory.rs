use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use bsv_types::{Block, Cid, Multihash};

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// In-memory, HashMap-based block store.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock` for
/// safe concurrent access; the lock is never held across an await point.
pub struct InMemoryBlockStore {
    blocks: RwLock<HashMap<Multihash, Bytes>>,
}

impl InMemoryBlockStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn has(&self, cid: &Cid) -> StoreResult<bool> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.contains_key(cid.hash()))
    }

    async fn get(&self, cid: &Cid) -> StoreResult<Option<Bytes>> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.get(cid.hash()).cloned())
    }

    async fn put(&self, block: &Block) -> StoreResult<()> {
        if block.cid().is_null() {
            return Err(StoreError::NullKey);
        }
        let mut map = self.blocks.write().expect("lock poisoned");
        map.entry(*block.cid().hash())
            .or_insert_with(|| block.data().clone());
        Ok(())
    }

    async fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        let mut map = self.blocks.write().expect("lock poisoned");
        Ok(map.remove(cid.hash()).is_some())
    }
}

impl std::fmt::Debug for InMemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlockStore")
            .field("block_count", &count)
            .finish()
    }
}
