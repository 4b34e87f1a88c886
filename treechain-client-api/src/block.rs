use crate::{time::system_time_to_bytes, BlockNumber};
use blake2::{Blake2b512, Digest};
use blocksberg::HexArrayHelper;
use pinxit::{PeerId, Signable, Signature, Signer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::{convert::Infallible, fmt, str::FromStr, time::SystemTime};

/// Length of a `BlockHash` in bytes (BLAKE2b-512).
pub const HASH_SIZE: usize = 64;

const HASH_HELPER: HexArrayHelper = HexArrayHelper("BlockHash", HASH_SIZE);

/// A `Block` is one entry of the chain.
///
/// The `hash` field is carried as plain data. Whoever needs integrity
/// has to compare it against `compute_hash()`.
///
/// ```
/// use pinxit::Identity;
/// use serde_json::json;
/// use treechain_client_api::{Block, BlockHash, BlockNumber};
///
/// let authority = Identity::generate();
/// let mut block = Block::new(BlockNumber::genesis(), BlockHash::default(), json!("Genesis Block"));
/// block.sign(Some(&authority));
///
/// assert!(block.has_valid_hash());
/// assert!(block.verify(authority.id()));
/// assert!(!block.verify(Identity::generate().id()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// The position in the chain.
    pub index: BlockNumber,
    /// The time the block was created.
    pub timestamp: SystemTime,
    /// The payload.
    pub data: Value,
    /// The hash of the preceding block (all zeros for the genesis block).
    pub previous_hash: BlockHash,
    /// The hash of this block as claimed by its creator.
    pub hash: BlockHash,
    /// The signature of the chain authority over the hash.
    pub authority_signature: Option<Signature>,
    /// The signature of the owner of the payload over the hash.
    pub owner_signature: Option<Signature>,
}

impl Block {
    /// Create an unsigned block with the current time and a matching hash.
    #[must_use]
    pub fn new(index: BlockNumber, previous_hash: BlockHash, data: Value) -> Self {
        Self::with_timestamp(index, previous_hash, SystemTime::now(), data)
    }

    /// Create an unsigned block with a given timestamp and a matching hash.
    #[must_use]
    pub fn with_timestamp(
        index: BlockNumber,
        previous_hash: BlockHash,
        timestamp: SystemTime,
        data: Value,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash: BlockHash::default(),
            authority_signature: None,
            owner_signature: None,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Calculate the hash from `previous_hash`, `timestamp` and `data`.
    ///
    /// Object keys of `data` are hashed in sorted order, so equal values
    /// always hash equally.
    #[must_use]
    pub fn compute_hash(&self) -> BlockHash {
        let mut hasher = Blake2b512::new();
        hasher.update(&self.previous_hash.0);
        hasher.update(system_time_to_bytes(self.timestamp));
        hasher.update(self.data.to_string().as_bytes());

        let mut hash = BlockHash::default();
        hash.0.copy_from_slice(&hasher.finalize());
        hash
    }

    /// Whether the stored `hash` matches the content.
    #[must_use]
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Sign the block as authority.
    ///
    /// Without a signer the signature is removed and the block will never verify.
    pub fn sign(&mut self, authority: Option<&dyn Signer>) {
        let hash = self.compute_hash();
        self.authority_signature = authority.map(|signer| signer.sign_bytes(hash.as_bytes()));
    }

    /// Check the authority signature against the recomputed hash.
    #[must_use]
    pub fn verify(&self, authority: &PeerId) -> bool {
        verify_signature(self.compute_hash(), authority, self.authority_signature.as_ref())
    }

    /// Claim ownership of the payload.
    ///
    /// Without a signer any existing owner claim is removed.
    pub fn mark_owner(&mut self, owner: Option<&dyn Signer>) {
        let hash = self.compute_hash();
        self.owner_signature = owner.map(|signer| signer.sign_bytes(hash.as_bytes()));
    }

    /// Check the owner signature against the recomputed hash.
    ///
    /// This is independent of the authority signature.
    #[must_use]
    pub fn verify_owner(&self, owner: &PeerId) -> bool {
        verify_signature(self.compute_hash(), owner, self.owner_signature.as_ref())
    }
}

fn verify_signature(hash: BlockHash, peer_id: &PeerId, signature: Option<&Signature>) -> bool {
    match signature {
        Some(signature) => peer_id.verify(hash, signature).is_ok(),
        None => false,
    }
}

/// The datatype of hashes of blocks is `BlockHash`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct BlockHash([u8; HASH_SIZE]);

impl BlockHash {
    /// Parse a `BlockHash` from its hex representation.
    pub fn from_hex(hex: &str) -> Result<Self, blocksberg::FromHexError> {
        let mut hash = Self::default();
        blocksberg::decode_hex(hex, &mut hash.0)?;
        Ok(hash)
    }

    /// The hex representation.
    #[must_use]
    pub fn hex(&self) -> String {
        self.to_string()
    }

    /// The raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for BlockHash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        blocksberg::write_hex!(f, &self.0, HASH_SIZE)
    }
}

impl Default for BlockHash {
    fn default() -> Self {
        Self([0; HASH_SIZE])
    }
}

impl FromStr for BlockHash {
    type Err = blocksberg::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Signable for BlockHash {
    type SignableData = [u8; HASH_SIZE];
    type Error = Infallible;

    fn signable_data(&self) -> Result<Self::SignableData, Self::Error> {
        Ok(self.0)
    }
}

impl Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        HASH_HELPER.serialize(serializer, &self.0)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut hash = Self::default();
        HASH_HELPER.deserialize(deserializer, &mut hash.0)?;
        Ok(hash)
    }
}
