//! Foundation types for the block service.
//!
//! Every other `bsv` crate depends on `bsv-types`. Nothing in here computes a
//! hash: identifiers are built from digests produced elsewhere (see
//! `bsv-crypto`) and are treated as opaque, comparable keys. Identifier
//! encoding is delegated to the `cid` and `multihash` crates, so every text
//! form they understand (base58btc V0, base32 V1, any other multibase) parses.
//!
//! # Key Types
//!
//! - [`Multihash`]: self-describing digest, a hash function code plus digest bytes
//! - [`HashCode`]: the hash functions this workspace can compute
//! - [`Codec`]: multicodec tag describing how a payload is encoded
//! - [`Cid`]: content identifier (version, codec, multihash)
//! - [`Block`]: immutable pairing of a [`Cid`] with its payload

pub mod block;
pub mod codec;
pub mod error;
pub mod hash;
pub mod ident;

pub use block::Block;
pub use codec::Codec;
pub use error::TypeError;
pub use hash::{HashCode, Multihash};
pub use ident::{Cid, Version};
