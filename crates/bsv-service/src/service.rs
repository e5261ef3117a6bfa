use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use bsv_crypto::{BlockHasher, HasherError};
use bsv_exchange::{Exchange, ExchangeError, ExchangeResult};
use bsv_store::{BatchOutcome, BlockStore};
use bsv_types::{Block, Cid};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::slot::ExchangeSlot;

/// Block access coordinator.
///
/// Owns a local store and an optional exchange. The service keeps no block
/// state of its own and does not serialize callers: concurrent operations on
/// the same or different identifiers go straight to the store, which is the
/// authority on per-key consistency.
pub struct BlockService<S> {
    store: S,
    exchange: ExchangeSlot,
    config: ServiceConfig,
}

impl<S: BlockStore> BlockService<S> {
    /// Create an offline service over `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            exchange: ExchangeSlot::new(),
            config,
        }
    }

    /// The local store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ---- Exchange lifecycle ----

    /// Attach an exchange, replacing any attached one. Returns the previous
    /// exchange.
    pub fn set_exchange(&self, exchange: Arc<dyn Exchange>) -> Option<Arc<dyn Exchange>> {
        info!(exchange = exchange.name(), "exchange attached");
        self.exchange.set(exchange)
    }

    /// Detach the exchange. Subsequent reads are local-only.
    pub fn unset_exchange(&self) -> Option<Arc<dyn Exchange>> {
        let previous = self.exchange.clear();
        if let Some(ex) = &previous {
            info!(exchange = ex.name(), "exchange detached");
        }
        previous
    }

    pub fn has_exchange(&self) -> bool {
        self.exchange.is_set()
    }

    // ---- Block operations ----

    /// Resolve `cid` to its block.
    ///
    /// Local store first; on a miss, the attached exchange if there is one.
    /// Blocks fetched from the exchange are returned as-is and are not
    /// written to the local store.
    pub async fn get(&self, cid: &Cid) -> ServiceResult<Block> {
        validate_cid(cid)?;

        if let Some(data) = self.store.get(cid).await? {
            debug!(cid = %cid, len = data.len(), "block served from store");
            return Ok(Block::new(cid.clone(), data));
        }

        let Some(exchange) = self.exchange.snapshot() else {
            debug!(cid = %cid, "block missing and offline");
            return Err(ServiceError::NotFound {
                cid: cid.clone(),
                cause: None,
            });
        };

        let fetched = bounded(self.config.fetch_timeout(), "get", exchange.get(cid)).await;
        let block = match fetched {
            Ok(block) => block,
            Err(cause) => {
                debug!(
                    cid = %cid,
                    exchange = exchange.name(),
                    error = %cause,
                    "exchange could not supply block"
                );
                return Err(ServiceError::NotFound {
                    cid: cid.clone(),
                    cause: Some(cause),
                });
            }
        };

        self.check_fetched(cid, &block)?;
        debug!(cid = %cid, exchange = exchange.name(), "block served from exchange");
        Ok(block)
    }

    /// Local presence check. Never consults the exchange.
    pub async fn has(&self, cid: &Cid) -> ServiceResult<bool> {
        validate_cid(cid)?;
        Ok(self.store.has(cid).await?)
    }

    /// Persist `block`, then announce it to the exchange if one is attached.
    ///
    /// Returns once the store reports the block durable. Announce failures
    /// are logged and never fail the call.
    pub async fn put(&self, block: &Block) -> ServiceResult<()> {
        validate_block(block)?;
        if self.config.verify_on_put {
            verify_payload(block)?;
        }

        self.store.put(block).await?;
        debug!(cid = %block.cid(), len = block.len(), "block stored");

        if let Some(exchange) = self.exchange.snapshot() {
            self.announce(exchange.as_ref(), block).await;
        }
        Ok(())
    }

    /// Persist a batch of blocks.
    ///
    /// Every block is validated before anything is written. The store decides
    /// batch durability; if it persists only part of the batch the call fails
    /// with [`ServiceError::Batch`] naming exactly which blocks landed and
    /// which did not. Every block that landed is announced individually.
    pub async fn put_many(&self, blocks: &[Block]) -> ServiceResult<Vec<Cid>> {
        if blocks.is_empty() {
            return Ok(Vec::new());
        }
        for (index, block) in blocks.iter().enumerate() {
            validate_block(block).map_err(|e| at_index(index, e))?;
            if self.config.verify_on_put {
                verify_payload(block).map_err(|e| at_index(index, e))?;
            }
        }

        let outcome = self.store.put_many(blocks).await?;
        debug!(
            requested = blocks.len(),
            stored = outcome.stored().len(),
            failed = outcome.failed().len(),
            "block batch written"
        );

        if let Some(exchange) = self.exchange.snapshot() {
            let failed: HashSet<usize> = outcome.failed().iter().map(|f| f.index).collect();
            let landed = blocks
                .iter()
                .enumerate()
                .filter(|(i, _)| !failed.contains(i))
                .map(|(_, b)| b.clone());
            self.announce_all(exchange, landed).await;
        }

        match outcome {
            BatchOutcome::Complete(stored) => Ok(stored),
            outcome => {
                let (stored, failed) = outcome.into_parts();
                warn!(
                    stored = stored.len(),
                    failed = failed.len(),
                    "block batch incomplete"
                );
                Err(ServiceError::Batch { stored, failed })
            }
        }
    }

    /// Remove `cid` from the local store. Absent blocks are not an error and
    /// the exchange is never told.
    pub async fn delete(&self, cid: &Cid) -> ServiceResult<()> {
        validate_cid(cid)?;
        let existed = self.store.delete(cid).await?;
        debug!(cid = %cid, existed, "block deleted");
        Ok(())
    }

    // ---- Internals ----

    async fn announce(&self, exchange: &dyn Exchange, block: &Block) {
        let result = bounded(self.config.announce_timeout(), "put", exchange.put(block)).await;
        log_announce(exchange.name(), block.cid(), result);
    }

    async fn announce_all(
        &self,
        exchange: Arc<dyn Exchange>,
        blocks: impl Iterator<Item = Block>,
    ) {
        let limit = self.config.announce_timeout();
        let mut tasks = JoinSet::new();
        for block in blocks {
            let exchange = Arc::clone(&exchange);
            tasks.spawn(async move {
                let result = bounded(limit, "put", exchange.put(&block)).await;
                log_announce(exchange.name(), block.cid(), result);
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "announce task failed");
            }
        }
    }

    /// An exchange block must carry the requested identifier, and with
    /// `verify_fetched` its payload must hash to it.
    fn check_fetched(&self, requested: &Cid, block: &Block) -> ServiceResult<()> {
        if block.cid() != requested {
            return Err(ServiceError::Integrity {
                cid: requested.clone(),
                reason: format!("exchange returned block {}", block.cid()),
            });
        }
        if self.config.verify_fetched {
            match BlockHasher::verify(block) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(ServiceError::Integrity {
                        cid: requested.clone(),
                        reason: "fetched payload does not match digest".into(),
                    })
                }
                Err(HasherError::UnsupportedHash(code)) => {
                    debug!(cid = %requested, code, "cannot verify fetched block, passing through");
                }
                Err(e) => {
                    return Err(ServiceError::Integrity {
                        cid: requested.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

impl<S> std::fmt::Debug for BlockService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockService")
            .field("exchange", &self.exchange)
            .field("config", &self.config)
            .finish()
    }
}

fn validate_cid(cid: &Cid) -> ServiceResult<()> {
    cid.validate()
        .map_err(|e| ServiceError::InvalidArgument(format!("cid {cid:?}: {e}")))
}

fn validate_block(block: &Block) -> ServiceResult<()> {
    block
        .validate()
        .map_err(|e| ServiceError::InvalidArgument(format!("block {:?}: {e}", block.cid())))
}

fn verify_payload(block: &Block) -> ServiceResult<()> {
    match BlockHasher::verify(block) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::Integrity {
            cid: block.cid().clone(),
            reason: "payload does not match digest".into(),
        }),
        Err(e) => Err(ServiceError::InvalidArgument(format!(
            "cannot verify block {:?}: {e}",
            block.cid()
        ))),
    }
}

/// Prefix a per-block error with the block's position in its batch.
fn at_index(index: usize, err: ServiceError) -> ServiceError {
    match err {
        ServiceError::InvalidArgument(msg) => {
            ServiceError::InvalidArgument(format!("block {index}: {msg}"))
        }
        ServiceError::Integrity { cid, reason } => ServiceError::Integrity {
            cid,
            reason: format!("block {index}: {reason}"),
        },
        other => other,
    }
}

/// Run an exchange call, optionally bounded by `limit`.
async fn bounded<T>(
    limit: Option<Duration>,
    op: &'static str,
    call: impl Future<Output = ExchangeResult<T>>,
) -> ExchangeResult<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(ExchangeError::Timeout(op))),
        None => call.await,
    }
}

fn log_announce(exchange: &str, cid: &Cid, result: ExchangeResult<()>) {
    match result {
        Ok(()) => debug!(exchange, cid = %cid, "block announced"),
        Err(ExchangeError::Unsupported(_)) => {
            debug!(exchange, cid = %cid, "exchange does not announce blocks")
        }
        Err(e) => warn!(exchange, cid = %cid, error = %e, "block announce failed"),
    }
}
