use async_trait::async_trait;

use bsv_types::{Block, Cid};

use crate::error::{ExchangeError, ExchangeResult};

/// Network block exchange.
///
/// Both operations are optional capabilities. The default implementations
/// report [`ExchangeError::Unsupported`], so an exchange that only fetches (or
/// only announces) implements just that method.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "exchange"
    }

    /// Fetch a block from peers.
    ///
    /// Retry policy, if any, belongs to the implementation.
    async fn get(&self, cid: &Cid) -> ExchangeResult<Block> {
        let _ = cid;
        Err(ExchangeError::Unsupported("get"))
    }

    /// Announce a newly stored block to peers.
    async fn put(&self, block: &Block) -> ExchangeResult<()> {
        let _ = block;
        Err(ExchangeError::Unsupported("put"))
    }
}

/// An exchange with no capabilities.
///
/// Attaching it marks a service as online without giving it any reach.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineExchange;

#[async_trait]
impl Exchange for OfflineExchange {
    fn name(&self) -> &str {
        "offline"
    }
}
