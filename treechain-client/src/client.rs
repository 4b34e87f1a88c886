//! A client for the API of a node.

use balise::{client, Address, Error};
use pinxit::PeerId;
use serde_json::Value;
use treechain_client_api::{message, BlockHash, ChainSnapshot, ClientMessage, SubmittedEntry};

/// A Client Instance.
///
/// Keeps one connection to the API of a node.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use treechain_client::Client;
///
/// # async fn test() {
/// let mut client = Client::new("localhost:3100".parse().unwrap());
/// let entry = client
///     .submit_entry("temperature", json!({"celsius": 21}))
///     .await
///     .unwrap();
/// assert_eq!(
///     client.verify_ownership(entry.block.hash, entry.owner_id).await.unwrap(),
///     Some(true)
/// );
/// # }
/// ```
pub struct Client {
    node_client: client::Client<ClientMessage>,
}

impl Client {
    /// Create a new client for the API at `api_address`.
    #[must_use]
    pub const fn new(api_address: Address) -> Self {
        Self {
            node_client: client::Client::new(api_address),
        }
    }

    /// Check that the node answers.
    pub async fn ping(&mut self) -> Result<(), Error> {
        self.node_client.send_request(message::Ping).await?;
        Ok(())
    }

    /// Append an entry. The node must be the authority.
    pub async fn submit_entry(
        &mut self,
        name: impl Into<String>,
        payload: Value,
    ) -> Result<SubmittedEntry, Error> {
        self.node_client
            .send_request(message::SubmitEntry(name.into(), payload))
            .await
    }

    /// Get the whole chain.
    pub async fn chain(&mut self) -> Result<ChainSnapshot, Error> {
        self.node_client.send_request(message::GetChain).await
    }

    /// Check the owner claim of a block. `None` if the node does not know the block.
    pub async fn verify_ownership(
        &mut self,
        hash: BlockHash,
        owner: PeerId,
    ) -> Result<Option<bool>, Error> {
        self.node_client
            .send_request(message::VerifyOwnership(hash, owner))
            .await
    }

    /// Let the node recheck its chain.
    pub async fn validate_chain(&mut self) -> Result<bool, Error> {
        self.node_client.send_request(message::ValidateChain).await
    }
}
