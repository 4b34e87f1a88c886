use crate::Block;
use pinxit::PeerId;
use serde::{Deserialize, Serialize};

/// The transferable state of a chain.
///
/// This is what a `sync` message carries and what `GetChain` returns.
/// A private key is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    /// The key every block of the chain has to be signed with.
    pub authority_public_key: Option<PeerId>,
    /// All blocks, starting at the genesis block.
    pub blocks: Vec<Block>,
}
