use async_trait::async_trait;
use tracing::debug;

use bsv_store::BlockStore;
use bsv_types::{Block, Cid};

use crate::error::{ExchangeError, ExchangeResult};
use crate::exchange::Exchange;

/// Exchange that treats another block store as the remote peer.
///
/// Fetches read from the peer store; announcements write into it, standing in
/// for a peer that pulls whatever it is told about. Useful for tests and for
/// pairing two local repositories.
pub struct LoopbackExchange<S> {
    name: String,
    peer: S,
}

impl<S: BlockStore> LoopbackExchange<S> {
    pub fn new(name: impl Into<String>, peer: S) -> Self {
        Self {
            name: name.into(),
            peer,
        }
    }

    /// The store standing in for the peer.
    pub fn peer(&self) -> &S {
        &self.peer
    }
}

#[async_trait]
impl<S: BlockStore> Exchange for LoopbackExchange<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, cid: &Cid) -> ExchangeResult<Block> {
        match self.peer.get(cid).await? {
            Some(data) => {
                debug!(exchange = %self.name, cid = %cid, "fetched block from peer");
                Ok(Block::new(cid.clone(), data))
            }
            None => Err(ExchangeError::NotFound(cid.clone())),
        }
    }

    async fn put(&self, block: &Block) -> ExchangeResult<()> {
        self.peer.put(block).await?;
        debug!(exchange = %self.name, cid = %block.cid(), "announced block to peer");
        Ok(())
    }
}

impl<S> std::fmt::Debug for LoopbackExchange<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackExchange")
            .field("name", &self.name)
            .finish()
    }
}
