//! The replication state machine of a node.
//!
//! A `Node` owns the chain and the senders of all peer connections. It is
//! driven by one task (see [`Node::spawn`]) that handles one `Event` at a
//! time, so every message sees a consistent chain.
//!
//! ```
//! use balise::FrameSender;
//! use pinxit::Identity;
//! use serde_json::json;
//! use treechain::{chain::Chain, message::{Message, Payload}, node::{ConnectionId, Node}};
//!
//! let chain = Chain::new(Identity::generate(), json!("Genesis Block"));
//! let mut node = Node::new(chain);
//!
//! // a new downstream peer is bootstrapped with the whole chain
//! let (sender, mut frames) = FrameSender::channel();
//! node.connected(ConnectionId::next(), sender);
//!
//! let message = Message::decode(&frames.try_recv().unwrap()).unwrap();
//! assert!(matches!(message.payload, Payload::Sync(snapshot) if snapshot.blocks.len() == 1));
//! ```

mod handle;

pub use handle::{Event, NodeHandle};

use crate::{
    chain::{self, Chain},
    message::{self, Message, Payload},
};
use balise::FrameSender;
use err_derive::Error;
use pinxit::{Identity, PeerId};
use serde_json::{json, Value};
use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use treechain_client_api::{Block, BlockHash, ChainSnapshot, SubmittedEntry};

/// An error of the `node` module.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The chain refused the operation.
    #[error(display = "{}", 0)]
    Chain(#[error(from)] chain::Error),

    /// A message could not be encoded.
    #[error(display = "{}", 0)]
    Message(#[error(from)] message::Error),

    /// The node task is not running anymore.
    #[error(display = "The node has stopped.")]
    Stopped,
}

/// Identifies a downstream connection for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate an id that was never handed out before.
    #[must_use]
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a message came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The node this one connected to.
    Upstream,
    /// A node that connected to this one.
    Downstream(ConnectionId),
    /// A request of a local client.
    Local,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Upstream => f.write_str("upstream"),
            Self::Downstream(id) => write!(f, "downstream {}", id),
            Self::Local => f.write_str("local"),
        }
    }
}

/// A `Node` replicates one chain over a tree of peers.
#[derive(Debug)]
pub struct Node {
    chain: Chain,
    upstream: Option<FrameSender>,
    downstream: BTreeMap<ConnectionId, FrameSender>,
}

impl Node {
    /// Create a node without any connections.
    #[must_use]
    pub const fn new(chain: Chain) -> Self {
        Self {
            chain,
            upstream: None,
            downstream: BTreeMap::new(),
        }
    }

    /// The current chain.
    #[must_use]
    pub const fn chain(&self) -> &Chain {
        &self.chain
    }

    /// The number of connected downstream peers.
    #[must_use]
    pub fn downstream_count(&self) -> usize {
        self.downstream.len()
    }

    /// Whether an upstream connection exists.
    #[must_use]
    pub const fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    /// Handle a single event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Connected { id, sender } => self.connected(id, sender),
            Event::Received { origin, frame } => self.handle_frame(origin, &frame),
            Event::Disconnected(id) => self.disconnected(id),
            Event::UpstreamConnected(sender) => self.upstream_connected(sender),
            Event::UpstreamLost => self.upstream_lost(),
            Event::SubmitEntry {
                name,
                payload,
                reply,
            } => {
                let _ = reply.send(self.submit_entry(name, payload));
            }
            Event::GetChain(reply) => {
                let _ = reply.send(self.chain.snapshot());
            }
            Event::VerifyOwnership { hash, owner, reply } => {
                let _ = reply.send(self.verify_ownership(&hash, &owner));
            }
            Event::Validate(reply) => {
                let _ = reply.send(self.validate());
            }
        }
    }

    /// Register a downstream peer and send it the whole chain.
    pub fn connected(&mut self, id: ConnectionId, sender: FrameSender) {
        log::info!("Downstream peer {} connected.", id);
        send_message(&sender, &Message::sync(self.chain.snapshot()));
        self.downstream.insert(id, sender);
    }

    /// Forget a downstream peer.
    pub fn disconnected(&mut self, id: ConnectionId) {
        if self.downstream.remove(&id).is_some() {
            log::info!("Downstream peer {} disconnected.", id);
        }
    }

    /// Use `sender` as the upstream connection.
    pub fn upstream_connected(&mut self, sender: FrameSender) {
        log::info!("Connected to upstream.");
        self.upstream = Some(sender);
    }

    /// Forget the upstream connection.
    pub fn upstream_lost(&mut self) {
        if self.upstream.take().is_some() {
            log::warn!("Lost connection to upstream.");
        }
    }

    /// Decode and handle a frame. Undecodable frames are dropped.
    pub fn handle_frame(&mut self, origin: Origin, frame: &[u8]) {
        match Message::decode(frame) {
            Ok(message) => self.handle_message(origin, message),
            Err(message::Error::UnknownType(kind)) => {
                log::warn!("Dropping message of unknown type {:?} from {}.", kind, origin);
            }
            Err(err) => log::warn!("Dropping message from {}: {}", origin, err),
        }
    }

    /// Apply a message received from `origin`.
    pub fn handle_message(&mut self, origin: Origin, message: Message) {
        log::trace!("Received {} message from {}.", message.payload.kind(), origin);
        let Message { payload, id } = message;
        match payload {
            Payload::Add(block) => self.handle_add(origin, block, id),
            Payload::Sync(snapshot) => self.handle_sync(origin, snapshot),
            Payload::Reject(block) => self.handle_reject(origin, &block),
        }
    }

    fn handle_add(&mut self, origin: Origin, block: Block, id: Option<String>) {
        let signed = match self.chain.authority_id() {
            Some(authority) => block.verify(authority),
            None => false,
        };
        if !signed {
            log::warn!(
                "Block {} ({}) from {} is not signed by the authority.",
                block.index,
                block.hash,
                origin
            );
            self.reply(origin, &Message::reject(block));
            return;
        }

        if let Err(err) = self.chain.add_block_from_network(block.clone()) {
            log::warn!(
                "Rejecting block {} ({}) from {}: {}",
                block.index,
                block.hash,
                origin,
                err
            );
            self.reply(origin, &Message::reject(block));
            return;
        }

        log::info!("Accepted block {} ({}) from {}.", block.index, block.hash, origin);
        self.propagate(
            origin,
            &Message {
                payload: Payload::Add(block),
                id,
            },
        );
    }

    fn handle_sync(&mut self, origin: Origin, snapshot: ChainSnapshot) {
        // A sync is trusted as is. Peers are assumed to be honest, so the
        // incoming chain is neither validated nor compared to the local one.
        self.chain.replace_with(snapshot);
        log::info!(
            "Synced {} blocks from {} (authority {:?}).",
            self.chain.len(),
            origin,
            self.chain.authority_id()
        );

        // Downstream peers were bootstrapped with the replaced chain.
        if origin == Origin::Upstream {
            self.propagate(origin, &Message::sync(self.chain.snapshot()));
        }
    }

    fn handle_reject(&mut self, origin: Origin, block: &Block) {
        if self.chain.remove_block(&block.hash) {
            log::warn!(
                "Rolled back to before block {} ({}) rejected by {}.",
                block.index,
                block.hash,
                origin
            );
        } else {
            log::warn!(
                "Ignoring reject of unknown block {} from {}.",
                block.hash,
                origin
            );
        }
    }

    /// Append a new entry as the authority and broadcast it.
    ///
    /// A fresh owner key is generated for the entry and returned.
    pub fn submit_entry(&mut self, name: String, payload: Value) -> Result<SubmittedEntry, Error> {
        let owner = Identity::generate();
        let data = json!({ "name": name, "payload": payload });
        let block = self.chain.add_block(data, Some(&owner))?.clone();
        log::info!("Created block {} ({}).", block.index, block.hash);

        self.propagate(Origin::Local, &Message::add(block.clone()));
        Ok(SubmittedEntry {
            block,
            owner_secret: owner.hex(),
            owner_id: owner.id().clone(),
        })
    }

    /// Check the owner claim of a block. `None` if the block is unknown.
    #[must_use]
    pub fn verify_ownership(&self, hash: &BlockHash, owner: &PeerId) -> Option<bool> {
        self.chain
            .block_by_hash(hash)
            .map(|block| block.verify_owner(owner))
    }

    /// Recheck the whole chain.
    #[must_use]
    pub fn validate(&self) -> bool {
        let valid = self.chain.is_valid();
        if !valid {
            log::warn!("The local chain is invalid.");
        }
        valid
    }

    /// Send to every peer except `origin`.
    fn propagate(&self, origin: Origin, message: &Message) {
        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("Could not encode {} message: {}", message.payload.kind(), err);
                return;
            }
        };

        for (id, sender) in &self.downstream {
            if origin != Origin::Downstream(*id) {
                sender.send(frame.clone());
            }
        }
        if origin != Origin::Upstream {
            if let Some(upstream) = &self.upstream {
                upstream.send(frame);
            }
        }
    }

    /// Send to `origin` only.
    fn reply(&self, origin: Origin, message: &Message) {
        let sender = match origin {
            Origin::Upstream => self.upstream.as_ref(),
            Origin::Downstream(id) => self.downstream.get(&id),
            Origin::Local => None,
        };
        match sender {
            Some(sender) => send_message(sender, message),
            None => log::debug!("No connection to {} for {} message.", origin, message.payload.kind()),
        }
    }
}

fn send_message(sender: &FrameSender, message: &Message) {
    match message.encode() {
        Ok(frame) => {
            sender.send(frame);
        }
        Err(err) => log::error!("Could not encode {} message: {}", message.payload.kind(), err),
    }
}
