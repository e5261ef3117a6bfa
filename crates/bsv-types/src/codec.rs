use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Multicodec tag describing how a block's payload is encoded.
///
/// Comparison goes through [`Codec::code`], so `Other(0x55)` and `Raw` are
/// the same codec.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Codec {
    /// Opaque bytes (`0x55`).
    Raw,
    /// MerkleDAG protobuf (`0x70`). The only codec a V0 identifier can carry.
    DagPb,
    /// MerkleDAG CBOR (`0x71`).
    DagCbor,
    /// MerkleDAG JSON (`0x0129`).
    DagJson,
    /// Any other multicodec, carried opaquely.
    Other(u64),
}

impl Codec {
    pub const fn code(&self) -> u64 {
        match self {
            Self::Raw => 0x55,
            Self::DagPb => 0x70,
            Self::DagCbor => 0x71,
            Self::DagJson => 0x0129,
            Self::Other(code) => *code,
        }
    }

    pub const fn from_code(code: u64) -> Self {
        match code {
            0x55 => Self::Raw,
            0x70 => Self::DagPb,
            0x71 => Self::DagCbor,
            0x0129 => Self::DagJson,
            other => Self::Other(other),
        }
    }
}

impl PartialEq for Codec {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Codec {}

impl Hash for Codec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl PartialOrd for Codec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Codec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::from_code(self.code()) {
            Self::Raw => write!(f, "raw"),
            Self::DagPb => write!(f, "dag-pb"),
            Self::DagCbor => write!(f, "dag-cbor"),
            Self::DagJson => write!(f, "dag-json"),
            Self::Other(code) => write!(f, "0x{code:x}"),
        }
    }
}

impl FromStr for Codec {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "dag-pb" => Ok(Self::DagPb),
            "dag-cbor" => Ok(Self::DagCbor),
            "dag-json" => Ok(Self::DagJson),
            other => match other.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16)
                    .map(Self::from_code)
                    .map_err(|_| TypeError::UnknownCodec(other.to_string())),
                None => Err(TypeError::UnknownCodec(other.to_string())),
            },
        }
    }
}
