//! The chain of blocks and its admission rules.

use err_derive::Error;
use pinxit::{Identity, PeerId, Signer};
use serde_json::Value;
use treechain_client_api::{Block, BlockHash, BlockNumber, ChainSnapshot};

/// An error of local chain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Only the holder of the authority key may create blocks.
    #[error(display = "This node does not hold the authority key.")]
    NotAuthority,

    /// There is no tip to append to.
    #[error(display = "The chain has no blocks.")]
    EmptyChain,
}

/// The reason a block from the network was not appended.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdmissionError {
    /// The block does not directly follow the tip.
    #[error(display = "Expected block number {}, got {}.", expected, actual)]
    WrongIndex {
        /// The number the next block must have.
        expected: BlockNumber,
        /// The number of the received block.
        actual: BlockNumber,
    },

    /// The block does not link to the tip.
    #[error(display = "The previous hash does not match the tip {}.", 0)]
    WrongPreviousHash(BlockHash),

    /// The stored hash does not match the content.
    #[error(display = "The block hash {} does not match its content.", 0)]
    WrongHash(BlockHash),

    /// There is no tip to append to.
    #[error(display = "The chain has no blocks.")]
    EmptyChain,
}

/// An append-only list of blocks signed by one authority.
///
/// ```
/// use pinxit::Identity;
/// use serde_json::json;
/// use treechain::chain::Chain;
///
/// let authority = Identity::generate();
/// let mut chain = Chain::new(authority, json!("Genesis Block"));
///
/// let hash = chain.add_block(json!({"name": "a"}), None).unwrap().hash;
/// assert_eq!(chain.len(), 2);
/// assert!(chain.is_valid());
///
/// assert!(chain.remove_block(&hash));
/// assert_eq!(chain.len(), 1);
/// ```
#[derive(Debug)]
pub struct Chain {
    authority_public_key: Option<PeerId>,
    authority_private_key: Option<Identity>,
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain owned by `authority`, starting with a signed genesis block.
    #[must_use]
    pub fn new(authority: Identity, genesis_data: Value) -> Self {
        let mut chain = Self {
            authority_public_key: Some(authority.id().clone()),
            authority_private_key: Some(authority),
            blocks: Vec::new(),
        };
        let genesis = chain.create_genesis(genesis_data);
        chain.blocks.push(genesis);
        chain
    }

    /// Create an empty chain that waits for its first `sync`.
    ///
    /// A local authority key is kept and attached to every synced chain.
    #[must_use]
    pub const fn empty(authority: Option<Identity>) -> Self {
        Self {
            authority_public_key: None,
            authority_private_key: authority,
            blocks: Vec::new(),
        }
    }

    /// Restore a chain from a snapshot, attaching a local authority key if there is one.
    #[must_use]
    pub fn from_snapshot(snapshot: ChainSnapshot, authority: Option<Identity>) -> Self {
        Self {
            authority_public_key: snapshot.authority_public_key,
            authority_private_key: authority,
            blocks: snapshot.blocks,
        }
    }

    /// Create a genesis block, signed if this chain holds the authority key.
    ///
    /// The block is not appended.
    #[must_use]
    pub fn create_genesis(&self, data: Value) -> Block {
        let mut block = Block::new(BlockNumber::genesis(), BlockHash::default(), data);
        block.sign(self.signer());
        block
    }

    /// Create, sign and append a new block.
    ///
    /// `owner` optionally adds an owner claim to the block. Fails if the
    /// local private key is missing or belongs to another authority.
    pub fn add_block(&mut self, data: Value, owner: Option<&dyn Signer>) -> Result<&Block, Error> {
        if !self.is_authority() {
            return Err(Error::NotAuthority);
        }
        let authority = self.signer().ok_or(Error::NotAuthority)?;
        let tip = self.tip().ok_or(Error::EmptyChain)?;

        let mut block = Block::new(tip.index.next(), tip.hash, data);
        block.sign(Some(authority));
        block.mark_owner(owner);

        self.blocks.push(block);
        let index = self.blocks.len() - 1;
        Ok(&self.blocks[index])
    }

    /// Append a block received from another node.
    ///
    /// The checks run in a fixed order and nothing changes on failure.
    /// The authority signature is not checked here.
    pub fn add_block_from_network(&mut self, block: Block) -> Result<(), AdmissionError> {
        let tip = self.tip().ok_or(AdmissionError::EmptyChain)?;

        let expected = tip.index.next();
        if block.index != expected {
            return Err(AdmissionError::WrongIndex {
                expected,
                actual: block.index,
            });
        }
        if block.previous_hash != tip.hash {
            return Err(AdmissionError::WrongPreviousHash(tip.hash));
        }
        if !block.has_valid_hash() {
            return Err(AdmissionError::WrongHash(block.hash));
        }

        self.blocks.push(block);
        Ok(())
    }

    /// Drop blocks from the tail up to and including the block with hash `target`.
    ///
    /// Returns `false` and leaves the chain untouched if there is no such block.
    pub fn remove_block(&mut self, target: &BlockHash) -> bool {
        match self.blocks.iter().rposition(|block| &block.hash == target) {
            Some(position) => {
                self.blocks.truncate(position);
                true
            }
            None => false,
        }
    }

    /// Check hashes and links of all blocks after the genesis block.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.blocks.windows(2).all(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            current.has_valid_hash() && current.previous_hash == previous.hash
        })
    }

    /// Export everything but the private key.
    #[must_use]
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            authority_public_key: self.authority_public_key.clone(),
            blocks: self.blocks.clone(),
        }
    }

    /// Replace all blocks and the authority public key, keeping the local private key.
    pub fn replace_with(&mut self, snapshot: ChainSnapshot) {
        self.authority_public_key = snapshot.authority_public_key;
        self.blocks = snapshot.blocks;
    }

    /// The number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The last block.
    #[must_use]
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// All blocks, starting at the genesis block.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Find a block by its stored hash.
    #[must_use]
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.hash == hash)
    }

    /// The key blocks of this chain are signed with.
    #[must_use]
    pub const fn authority_id(&self) -> Option<&PeerId> {
        self.authority_public_key.as_ref()
    }

    /// Whether this chain holds the private key matching its authority.
    #[must_use]
    pub fn is_authority(&self) -> bool {
        match (&self.authority_private_key, &self.authority_public_key) {
            (Some(private), Some(public)) => private.id() == public,
            _ => false,
        }
    }

    fn signer(&self) -> Option<&dyn Signer> {
        self.authority_private_key
            .as_ref()
            .map(|identity| identity as &dyn Signer)
    }
}
