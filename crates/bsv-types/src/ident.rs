use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::TypeError;
use crate::hash::{validate_multihash, HashCode, Multihash};

pub use cid::Version;

/// Content identifier.
///
/// A thin wrapper over [`cid::Cid`] that adds the null identifier and the
/// well-formedness rules the block service enforces. Equality, ordering and
/// hashing are those of the binary form.
///
/// Text form is the canonical multibase string: base58btc (`Qm...`) for V0
/// and base32 (`b...`) for V1. Parsing accepts any multibase.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cid(cid::Cid);

impl Cid {
    /// A V1 identifier for `hash` under `codec`.
    pub fn new_v1(codec: Codec, hash: Multihash) -> Self {
        Self(cid::Cid::new_v1(codec.code(), hash))
    }

    /// A V0 identifier. Only sha2-256 multihashes are representable.
    pub fn new_v0(hash: Multihash) -> Result<Self, TypeError> {
        Ok(Self(cid::Cid::new_v0(hash)?))
    }

    /// The null identifier. Represents "no block" and is never well-formed.
    pub fn null() -> Self {
        Self::new_v1(Codec::Raw, Multihash::default())
    }

    /// Returns `true` if this is the null identifier.
    pub fn is_null(&self) -> bool {
        self.0.hash().size() == 0
    }

    /// Check that this identifier is well-formed.
    ///
    /// The null identifier and digests whose length disagrees with a known
    /// hash function fail.
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_multihash(self.0.hash())
    }

    pub fn version(&self) -> Version {
        self.0.version()
    }

    pub fn codec(&self) -> Codec {
        Codec::from_code(self.0.codec())
    }

    pub fn hash(&self) -> &Multihash {
        self.0.hash()
    }

    /// The hash function named by the identifier, if this workspace knows it.
    pub fn hash_code(&self) -> Option<HashCode> {
        HashCode::of(self.0.hash())
    }

    /// The same content under a V1 identifier.
    pub fn into_v1(self) -> Result<Self, TypeError> {
        Ok(Self(self.0.into_v1()?))
    }

    /// Binary form. V0 is the bare multihash.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        Ok(Self(cid::Cid::try_from(bytes)?))
    }

    /// Lowercase hex of the multihash. Used as the storage key.
    pub fn key_hex(&self) -> String {
        hex::encode(self.0.hash().to_bytes())
    }

    /// Short form for logs: codec and the first 8 hex characters of the digest.
    pub fn short(&self) -> String {
        let digest = self.0.hash().digest();
        let n = digest.len().min(4);
        format!("{}:{}", self.codec(), hex::encode(&digest[..n]))
    }

    pub fn as_inner(&self) -> &cid::Cid {
        &self.0
    }
}

impl From<cid::Cid> for Cid {
    fn from(cid: cid::Cid) -> Self {
        Self(cid)
    }
}

impl From<Cid> for cid::Cid {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.short())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Cid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(cid::Cid::from_str(s)?))
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.to_string()
    }
}

impl TryFrom<String> for Cid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// sha2-256("hello world")
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    const HELLO_V0: &str = "QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L4";
    const HELLO_V1_RAW: &str = "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e";

    fn hello() -> Multihash {
        Multihash::wrap(0x12, &hex::decode(HELLO_SHA256).unwrap()).unwrap()
    }

    fn sha(fill: u8) -> Multihash {
        Multihash::wrap(HashCode::Sha2_256.code(), &[fill; 32]).unwrap()
    }

    #[test]
    fn v0_text_is_base58btc() {
        let cid = Cid::new_v0(hello()).unwrap();
        assert_eq!(cid.to_string(), HELLO_V0);

        let parsed: Cid = HELLO_V0.parse().unwrap();
        assert_eq!(parsed, cid);
        assert_eq!(parsed.version(), Version::V0);
        assert_eq!(parsed.codec(), Codec::DagPb);
    }

    #[test]
    fn v1_text_is_base32() {
        let cid = Cid::new_v1(Codec::Raw, hello());
        assert_eq!(cid.to_string(), HELLO_V1_RAW);

        let parsed: Cid = HELLO_V1_RAW.parse().unwrap();
        assert_eq!(parsed, cid);
        assert_eq!(parsed.hash().digest(), hex::decode(HELLO_SHA256).unwrap().as_slice());
    }

    #[test]
    fn other_multibases_parse() {
        let cid = Cid::new_v1(Codec::Raw, hello());
        let base16 = format!("f{}", hex::encode(cid.to_bytes()));
        assert_eq!(base16.parse::<Cid>().unwrap(), cid);
    }

    #[test]
    fn garbage_text_rejected() {
        assert!(matches!("not-a-cid".parse::<Cid>(), Err(TypeError::Cid(_))));
        assert!("".parse::<Cid>().is_err());
    }

    #[test]
    fn v0_binary_is_bare_multihash() {
        let cid = Cid::new_v0(sha(2)).unwrap();
        assert_eq!(cid.to_bytes(), sha(2).to_bytes());
        let parsed = Cid::from_bytes(&cid.to_bytes()).unwrap();
        assert_eq!(parsed.version(), Version::V0);
        assert_eq!(parsed, cid);
    }

    #[test]
    fn v0_requires_sha2() {
        let blake = Multihash::wrap(HashCode::Blake3.code(), &[0; 32]).unwrap();
        assert!(matches!(Cid::new_v0(blake), Err(TypeError::Cid(_))));
    }

    #[test]
    fn equality_follows_binary_form() {
        let a = Cid::new_v1(Codec::Raw, sha(3));
        assert_eq!(a, Cid::new_v1(Codec::Other(0x55), sha(3)));
        assert_ne!(a, Cid::new_v1(Codec::DagCbor, sha(3)));
        assert_ne!(Cid::new_v0(sha(3)).unwrap(), Cid::new_v1(Codec::DagPb, sha(3)));
        assert_eq!(
            Cid::new_v0(sha(3)).unwrap().into_v1().unwrap(),
            Cid::new_v1(Codec::DagPb, sha(3))
        );
    }

    #[test]
    fn binary_roundtrip_preserves_value() {
        let cid = Cid::new_v1(Codec::Other(0x55), sha(6));
        assert_eq!(Cid::from_bytes(&cid.to_bytes()).unwrap(), cid);
        assert_eq!(cid.codec(), Codec::Raw);
    }

    #[test]
    fn null_is_never_valid() {
        let null = Cid::null();
        assert!(null.is_null());
        assert!(matches!(null.validate(), Err(TypeError::EmptyDigest)));
    }

    #[test]
    fn wrong_digest_length_is_invalid() {
        let short = Multihash::wrap(0x12, &[1; 20]).unwrap();
        let cid = Cid::new_v1(Codec::Raw, short);
        assert!(matches!(cid.validate(), Err(TypeError::InvalidLength { .. })));
    }

    #[test]
    fn well_formed_cids_validate() {
        assert!(Cid::new_v1(Codec::DagJson, sha(4)).validate().is_ok());
        assert!(Cid::new_v0(sha(4)).unwrap().validate().is_ok());
    }

    #[test]
    fn serde_uses_text_form() {
        let cid = Cid::new_v1(Codec::Raw, sha(5));
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, format!("\"{cid}\""));
        let parsed: Cid = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cid);
        assert!(serde_json::from_str::<Cid>("\"bafk\"").is_err());
    }

    #[test]
    fn key_hex_is_multihash_hex() {
        let cid = Cid::new_v1(Codec::Raw, hello());
        assert_eq!(cid.key_hex(), format!("1220{HELLO_SHA256}"));
    }

    #[test]
    fn debug_is_short() {
        let cid = Cid::new_v1(Codec::Raw, sha(0xab));
        assert_eq!(format!("{cid:?}"), "Cid(raw:abababab)");
    }
}
