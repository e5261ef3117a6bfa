//! Identifier construction for the block service.
//!
//! Computes multihashes over raw payloads and builds content identifiers and
//! blocks from them. Hash functions come from the multihash code table
//! (`sha2` and `blake3` backends); nothing here is custom cryptography.

pub mod hasher;

pub use hasher::{BlockHasher, HasherError};
