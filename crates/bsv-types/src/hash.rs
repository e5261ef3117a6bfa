use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Multihash with room for digests up to 64 bytes.
pub type Multihash = multihash::Multihash<64>;

/// Hash functions this workspace knows how to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashCode {
    /// SHA2-256 (multicodec `0x12`).
    #[serde(rename = "sha2-256")]
    Sha2_256,
    /// BLAKE3 with a 256-bit output (multicodec `0x1e`).
    Blake3,
}

impl HashCode {
    /// The multicodec code for this hash function.
    pub const fn code(&self) -> u64 {
        match self {
            Self::Sha2_256 => 0x12,
            Self::Blake3 => 0x1e,
        }
    }

    /// Digest size in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Sha2_256 | Self::Blake3 => 32,
        }
    }

    /// Canonical multicodec table name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha2_256 => "sha2-256",
            Self::Blake3 => "blake3",
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0x12 => Some(Self::Sha2_256),
            0x1e => Some(Self::Blake3),
            _ => None,
        }
    }

    /// The function that produced `hash`, if it is one of ours.
    pub fn of(hash: &Multihash) -> Option<Self> {
        Self::from_code(hash.code())
    }
}

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashCode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha2-256" | "sha256" => Ok(Self::Sha2_256),
            "blake3" => Ok(Self::Blake3),
            other => Err(TypeError::UnknownHash(other.to_string())),
        }
    }
}

/// Check that a multihash carries a digest, and that the digest has the
/// right length when the hash function is one we know.
pub fn validate_multihash(hash: &Multihash) -> Result<(), TypeError> {
    if hash.size() == 0 {
        return Err(TypeError::EmptyDigest);
    }
    if let Some(known) = HashCode::of(hash) {
        let actual = usize::from(hash.size());
        if actual != known.digest_len() {
            return Err(TypeError::InvalidLength {
                expected: known.digest_len(),
                actual,
            });
        }
    }
    Ok(())
}
