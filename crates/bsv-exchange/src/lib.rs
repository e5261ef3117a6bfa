//! Block exchange for the block service.
//!
//! An exchange is an optional, best-effort network collaborator that can fetch
//! blocks the local store lacks and announce blocks the local store gained.
//! Either capability may be missing; callers must degrade gracefully.

pub mod error;
pub mod exchange;
pub mod loopback;

pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{Exchange, OfflineExchange};
pub use loopback::LoopbackExchange;
