//! Messages exchanged between nodes.
//!
//! On the wire a message is a JSON object `{"type", "data", "id"?}`.
//!
//! ```
//! use serde_json::json;
//! use treechain::message::{Message, Payload};
//! use treechain_client_api::ChainSnapshot;
//!
//! let message = Message::sync(ChainSnapshot::default()).with_id("42");
//! let encoded = message.encode().unwrap();
//!
//! let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
//! assert_eq!(value["type"], json!("sync"));
//! assert_eq!(value["id"], json!("42"));
//!
//! assert_eq!(Message::decode(&encoded).unwrap(), message);
//! ```

use err_derive::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use treechain_client_api::{Block, ChainSnapshot};

/// An error while decoding or encoding a `Message`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The frame is not valid JSON or the data does not fit the type.
    #[error(display = "Malformed message: {}", 0)]
    Malformed(#[error(from)] serde_json::Error),

    /// The `type` is none of `add`, `sync` or `reject`.
    #[error(display = "Unknown message type {:?}.", 0)]
    UnknownType(String),
}

/// What a message asks the receiver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Append this block.
    Add(Block),
    /// Replace the whole chain.
    Sync(ChainSnapshot),
    /// Roll back to before this block.
    Reject(Block),
}

impl Payload {
    /// The wire name of this payload.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Sync(_) => "sync",
            Self::Reject(_) => "reject",
        }
    }
}

/// A message between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The content.
    pub payload: Payload,
    /// A correlation token, passed through but never interpreted.
    pub id: Option<String>,
}

impl Message {
    /// Ask the receiver to append `block`.
    #[must_use]
    pub const fn add(block: Block) -> Self {
        Self::new(Payload::Add(block))
    }

    /// Ask the receiver to replace its chain.
    #[must_use]
    pub const fn sync(snapshot: ChainSnapshot) -> Self {
        Self::new(Payload::Sync(snapshot))
    }

    /// Tell the receiver that `block` was not accepted.
    #[must_use]
    pub const fn reject(block: Block) -> Self {
        Self::new(Payload::Reject(block))
    }

    const fn new(payload: Payload) -> Self {
        Self { payload, id: None }
    }

    /// Attach a correlation token.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Encode as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let data = match &self.payload {
            Payload::Add(block) | Payload::Reject(block) => serde_json::to_value(block)?,
            Payload::Sync(snapshot) => serde_json::to_value(snapshot)?,
        };
        let raw = RawMessage {
            kind: self.payload.kind().to_string(),
            data,
            id: self.id.clone(),
        };
        Ok(serde_json::to_vec(&raw)?)
    }

    /// Decode from JSON.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let raw: RawMessage = serde_json::from_slice(data)?;
        let payload = match raw.kind.as_str() {
            "add" => Payload::Add(serde_json::from_value(raw.data)?),
            "sync" => Payload::Sync(serde_json::from_value(raw.data)?),
            "reject" => Payload::Reject(serde_json::from_value(raw.data)?),
            _ => return Err(Error::UnknownType(raw.kind)),
        };
        Ok(Self {
            payload,
            id: raw.id,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}
