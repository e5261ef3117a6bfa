//! Content-addressed block storage.
//!
//! A block store is a pure key/value store: the key is the multihash inside a
//! block's identifier and the value is the block's payload. Stores never
//! interpret payloads and never compute hashes.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlockStore`] trait:
//!
//! - [`InMemoryBlockStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlockStore`] -- one file per block under a sharded directory tree
//!
//! # Design Rules
//!
//! 1. Keys are multihashes, so V0 and V1 identifiers of the same content
//!    address the same entry.
//! 2. Writes are idempotent: content-addressing means a rewrite is a no-op.
//! 3. Deleting an absent block is not an error.
//! 4. Batch writes report per-block failures; they are not transactions.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod batch;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use batch::{BatchFailure, BatchOutcome};
pub use error::{StoreError, StoreResult};
pub use fs::{FsBlockStore, FsStoreConfig};
pub use memory::InMemoryBlockStore;
pub use traits::BlockStore;
