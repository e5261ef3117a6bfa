//! Block access coordinator.
//!
//! [`BlockService`] sits between a local [`BlockStore`] and an optional
//! [`Exchange`]. Reads go to the store first and fall back to the exchange on
//! a miss; writes land in the store and are then announced to the exchange.
//! Exchange failures never fail a write, and blocks fetched from the exchange
//! are handed to the caller without being persisted.
//!
//! ```text
//! get ──► store ──hit──► block
//!           │
//!          miss ──► exchange? ──► block (not stored)
//!
//! put ──► store ──ok──► announce (best-effort) ──► ok
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod slot;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use service::BlockService;
pub use slot::ExchangeSlot;

// Re-export key types
pub use bsv_exchange::{Exchange, ExchangeError, LoopbackExchange, OfflineExchange};
pub use bsv_store::{BatchFailure, BatchOutcome, BlockStore, FsBlockStore, InMemoryBlockStore};
pub use bsv_types::{Block, Cid, Codec};
