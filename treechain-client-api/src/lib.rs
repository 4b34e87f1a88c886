#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::similar_names)]

//! Library Crate used for Communication between external Clients and treechain nodes.
//!
//! It also holds the block types every node and client agrees on.

mod block;
mod block_number;
mod snapshot;
pub mod time;

pub use block::{Block, BlockHash, HASH_SIZE};
pub use block_number::BlockNumber;
pub use snapshot::ChainSnapshot;

use balise::define_api;
use pinxit::PeerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Play ping pong. See [`Ping`](message/struct.Ping.html).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pong;

/// A block created on request of a client.
///
/// The owner key is generated for this single entry and handed out once.
/// Whoever holds `owner_secret` can prove the claim on the block later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedEntry {
    /// The block as it was appended to the chain.
    pub block: Block,
    /// The hex encoded secret key of the owner.
    pub owner_secret: String,
    /// The public key matching `owner_secret`.
    pub owner_id: PeerId,
}

define_api! {
    /// The message API module for communication between clients and nodes.
    mod message;
    /// One of the requests.
    pub enum ClientMessage {
        /// Ping Message. See [`Pong`](../struct.Pong.html).
        Ping => Pong,
        /// Append `{"name", "payload"}` as a new block (name, payload).
        ///
        /// Only the authority node accepts this request.
        SubmitEntry(String, Value) => SubmittedEntry,
        /// Read the whole chain.
        GetChain => ChainSnapshot,
        /// Check the owner claim of a block (block hash, owner).
        ///
        /// `None` if the node has no block with this hash.
        VerifyOwnership(BlockHash, PeerId) => Option<bool>,
        /// Recheck hashes and linkage of the whole chain.
        ValidateChain => bool,
    }
}
