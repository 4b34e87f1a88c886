use super::{ConnectionId, Error, Node, Origin};
use balise::FrameSender;
use pinxit::PeerId;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use treechain_client_api::{BlockHash, ChainSnapshot, SubmittedEntry};

/// Everything that can happen to a node.
#[derive(Debug)]
pub enum Event {
    /// A downstream peer connected.
    Connected {
        /// The new connection.
        id: ConnectionId,
        /// Writes to the new connection.
        sender: FrameSender,
    },
    /// A frame arrived from a peer.
    Received {
        /// The sending peer.
        origin: Origin,
        /// The raw frame.
        frame: Vec<u8>,
    },
    /// A downstream peer disconnected.
    Disconnected(ConnectionId),
    /// The upstream connection is established.
    UpstreamConnected(FrameSender),
    /// The upstream connection is gone.
    UpstreamLost,
    /// A client wants to append an entry.
    SubmitEntry {
        /// The name of the entry.
        name: String,
        /// The payload of the entry.
        payload: Value,
        /// Receives the created block.
        reply: oneshot::Sender<Result<SubmittedEntry, Error>>,
    },
    /// A client wants the whole chain.
    GetChain(oneshot::Sender<ChainSnapshot>),
    /// A client wants to check an owner claim.
    VerifyOwnership {
        /// The block to check.
        hash: BlockHash,
        /// The claimed owner.
        owner: PeerId,
        /// Receives the result.
        reply: oneshot::Sender<Option<bool>>,
    },
    /// A client wants the chain to be rechecked.
    Validate(oneshot::Sender<bool>),
}

impl Node {
    /// Run the node on its own task.
    ///
    /// The task ends once every `NodeHandle` is dropped.
    #[must_use]
    pub fn spawn(mut self) -> NodeHandle {
        let (events, mut receiver) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                self.handle_event(event);
            }
            log::debug!("Node task finished.");
        });
        NodeHandle { events }
    }
}

/// Sends events to a running `Node`.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    events: mpsc::UnboundedSender<Event>,
}

impl NodeHandle {
    fn notify(&self, event: Event) {
        if self.events.send(event).is_err() {
            log::debug!("Node has stopped, event dropped.");
        }
    }

    async fn request<T>(&self, event: impl FnOnce(oneshot::Sender<T>) -> Event) -> Result<T, Error> {
        let (reply, response) = oneshot::channel();
        self.events.send(event(reply)).map_err(|_| Error::Stopped)?;
        response.await.map_err(|_| Error::Stopped)
    }

    /// Register a new downstream connection.
    #[must_use = "the id is needed to report the disconnect"]
    pub fn connected(&self, sender: FrameSender) -> ConnectionId {
        let id = ConnectionId::next();
        self.notify(Event::Connected { id, sender });
        id
    }

    /// Hand a received frame to the node.
    pub fn received(&self, origin: Origin, frame: Vec<u8>) {
        self.notify(Event::Received { origin, frame });
    }

    /// Report a closed downstream connection.
    pub fn disconnected(&self, id: ConnectionId) {
        self.notify(Event::Disconnected(id));
    }

    /// Register the upstream connection.
    pub fn upstream_connected(&self, sender: FrameSender) {
        self.notify(Event::UpstreamConnected(sender));
    }

    /// Report a closed upstream connection.
    pub fn upstream_lost(&self) {
        self.notify(Event::UpstreamLost);
    }

    /// Append an entry. Only works on the authority node.
    pub async fn submit_entry(&self, name: String, payload: Value) -> Result<SubmittedEntry, Error> {
        self.request(|reply| Event::SubmitEntry {
            name,
            payload,
            reply,
        })
        .await?
    }

    /// Get the whole chain.
    pub async fn chain(&self) -> Result<ChainSnapshot, Error> {
        self.request(Event::GetChain).await
    }

    /// Check the owner claim of a block. `None` if the block is unknown.
    pub async fn verify_ownership(&self, hash: BlockHash, owner: PeerId) -> Result<Option<bool>, Error> {
        self.request(|reply| Event::VerifyOwnership { hash, owner, reply })
            .await
    }

    /// Recheck the whole chain.
    pub async fn validate(&self) -> Result<bool, Error> {
        self.request(Event::Validate).await
    }
}
