use bytes::Bytes;
use multihash_codetable::{Code, MultihashDigest};

use bsv_types::{Block, Cid, Codec, HashCode, Multihash, TypeError};

/// Multihash-producing content hasher.
///
/// Each hasher is bound to one hash function. Identifiers it produces embed
/// that function's multicodec code, so [`BlockHasher::verify`] can later pick
/// the right function from the identifier alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHasher {
    code: HashCode,
}

impl BlockHasher {
    /// SHA2-256 hasher. Required for V0 identifiers.
    pub const SHA2_256: Self = Self {
        code: HashCode::Sha2_256,
    };
    /// BLAKE3 (256-bit output) hasher.
    pub const BLAKE3: Self = Self {
        code: HashCode::Blake3,
    };

    pub const fn new(code: HashCode) -> Self {
        Self { code }
    }

    /// The hash function this hasher applies.
    pub fn hash_code(&self) -> HashCode {
        self.code
    }

    fn table_code(&self) -> Code {
        match self.code {
            HashCode::Sha2_256 => Code::Sha2_256,
            HashCode::Blake3 => Code::Blake3_256,
        }
    }

    pub fn multihash(&self, data: &[u8]) -> Multihash {
        self.table_code().digest(data)
    }

    /// V1 identifier for `data` under `codec`.
    pub fn cid(&self, codec: Codec, data: &[u8]) -> Cid {
        Cid::new_v1(codec, self.multihash(data))
    }

    /// V0 identifier for `data` (sha2-256, dag-pb).
    pub fn cid_v0(data: &[u8]) -> Result<Cid, HasherError> {
        Ok(Cid::new_v0(Self::SHA2_256.multihash(data))?)
    }

    /// Build a block whose identifier is the hash of `data`.
    pub fn block(&self, codec: Codec, data: impl Into<Bytes>) -> Block {
        let data = data.into();
        let cid = self.cid(codec, &data);
        Block::new(cid, data)
    }

    /// Check that a block's payload hashes to the digest its identifier names.
    ///
    /// The hash function is taken from the identifier. Identifiers naming a
    /// hash function this crate cannot compute yield
    /// [`HasherError::UnsupportedHash`].
    pub fn verify(block: &Block) -> Result<bool, HasherError> {
        let cid = block.cid();
        cid.validate()?;
        let code = cid
            .hash_code()
            .ok_or(HasherError::UnsupportedHash(cid.hash().code()))?;
        Ok(Self::new(code).multihash(block.data()) == *cid.hash())
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("unsupported hash function: 0x{0:x}")]
    UnsupportedHash(u64),

    #[error(transparent)]
    Type(#[from] TypeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(
            BlockHasher::SHA2_256.multihash(data),
            BlockHasher::SHA2_256.multihash(data)
        );
    }

    #[test]
    fn sha2_256_known_vector() {
        let mh = BlockHasher::SHA2_256.multihash(b"abc");
        assert_eq!(mh.code(), 0x12);
        assert_eq!(
            hex_of(mh.digest()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn blake3_uses_its_multicodec() {
        let mh = BlockHasher::BLAKE3.multihash(b"abc");
        assert_eq!(mh.code(), 0x1e);
        assert_eq!(mh.size(), 32);
    }

    #[test]
    fn different_functions_produce_different_ids() {
        let data = b"same content";
        let sha = BlockHasher::SHA2_256.cid(Codec::Raw, data);
        let blake = BlockHasher::BLAKE3.cid(Codec::Raw, data);
        assert_ne!(sha, blake);
        assert_eq!(sha.hash_code(), Some(HashCode::Sha2_256));
        assert_eq!(blake.hash_code(), Some(HashCode::Blake3));
    }

    #[test]
    fn cid_v0_is_valid() {
        let cid = BlockHasher::cid_v0(b"A random data block").unwrap();
        assert!(!cid.is_null());
        assert!(cid.validate().is_ok());
        assert!(cid.to_string().starts_with("Qm"));
    }

    #[test]
    fn cid_v0_matches_canonical_text() {
        let cid = BlockHasher::cid_v0(b"hello world").unwrap();
        assert_eq!(cid.to_string(), "QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L4");
    }

    #[test]
    fn verify_correct_block() {
        let block = BlockHasher::BLAKE3.block(Codec::Raw, b"test data".to_vec());
        assert!(BlockHasher::verify(&block).unwrap());
    }

    #[test]
    fn verify_tampered_block() {
        let cid = BlockHasher::SHA2_256.cid(Codec::Raw, b"original");
        let forged = Block::new(cid, b"tampered".to_vec());
        assert!(!BlockHasher::verify(&forged).unwrap());
    }

    #[test]
    fn verify_unknown_hash_function() {
        let mh = Multihash::wrap(0xb220, &[1; 32]).unwrap();
        let block = Block::new(Cid::new_v1(Codec::Raw, mh), b"x".to_vec());
        assert!(matches!(
            BlockHasher::verify(&block),
            Err(HasherError::UnsupportedHash(0xb220))
        ));
    }

    #[test]
    fn verify_null_cid() {
        let block = Block::new(Cid::null(), b"x".to_vec());
        assert!(matches!(
            BlockHasher::verify(&block),
            Err(HasherError::Type(TypeError::EmptyDigest))
        ));
    }

    fn hex_of(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
