use std::fmt;

use bytes::Bytes;

use crate::ident::Cid;
use crate::error::TypeError;

/// An immutable pairing of a content identifier with its payload.
///
/// The identifier is expected to be the hash of the payload under the hash
/// function it declares. Constructing a `Block` does not check this; see
/// `bsv_crypto::BlockHasher::verify` for that.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Bytes,
}

impl Block {
    pub fn new(cid: Cid, data: impl Into<Bytes>) -> Self {
        Self {
            cid,
            data: data.into(),
        }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Cid, Bytes) {
        (self.cid, self.data)
    }

    /// A block is valid when its identifier is well-formed and it carries a
    /// non-empty payload.
    pub fn validate(&self) -> Result<(), TypeError> {
        self.cid.validate()?;
        if self.data.is_empty() {
            return Err(TypeError::EmptyPayload);
        }
        Ok(())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("cid", &self.cid)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Codec, HashCode, Multihash};

    fn cid() -> Cid {
        Cid::new_v1(
            Codec::Raw,
            Multihash::wrap(HashCode::Blake3.code(), &[9; 32]).unwrap(),
        )
    }

    #[test]
    fn accessors() {
        let block = Block::new(cid(), b"payload".to_vec());
        assert_eq!(block.cid(), &cid());
        assert_eq!(block.data().as_ref(), b"payload");
        assert_eq!(block.len(), 7);
        let (c, d) = block.into_parts();
        assert_eq!(c, cid());
        assert_eq!(d, Bytes::from_static(b"payload"));
    }

    #[test]
    fn empty_payload_is_invalid() {
        let block = Block::new(cid(), Bytes::new());
        assert!(matches!(block.validate(), Err(TypeError::EmptyPayload)));
    }

    #[test]
    fn null_cid_is_invalid() {
        let block = Block::new(Cid::null(), b"x".to_vec());
        assert!(matches!(block.validate(), Err(TypeError::EmptyDigest)));
    }

    #[test]
    fn debug_hides_payload() {
        let block = Block::new(cid(), vec![0u8; 1024]);
        let debug = format!("{block:?}");
        assert!(debug.contains("len: 1024"));
    }
}
