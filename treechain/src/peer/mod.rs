//! Connections between nodes.
//!
//! Every connection carries `Message` frames in both directions. The
//! `Receiver` accepts downstream peers; `connect_upstream` opens the single
//! connection towards the parent node.
//!
//! # Example
//!
//! ```no_run
//! use pinxit::Identity;
//! use serde_json::json;
//! use tokio::net::TcpListener;
//! use treechain::{chain::Chain, node::Node, peer::{self, Receiver}};
//!
//! # #[tokio::main]
//! # async fn main() {
//! // the root node
//! let root = Node::new(Chain::new(Identity::generate(), json!("Genesis Block"))).spawn();
//! let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//! tokio::spawn(Receiver::new(root).serve(listener));
//!
//! // a follower below it
//! let follower = Node::new(Chain::empty(None)).spawn();
//! peer::connect_upstream(&"127.0.0.1:3000".parse().unwrap(), follower)
//!     .await
//!     .unwrap();
//! # }
//! ```

mod receiver;
mod upstream;

pub use receiver::Receiver;
pub use upstream::connect_upstream;

use crate::node::{NodeHandle, Origin};
use balise::frame::read_frame;
use tokio::io::AsyncRead;

/// Hand every frame from `reader` to the node until the connection ends.
async fn read_frames<R>(mut reader: R, origin: Origin, node: &NodeHandle)
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                log::trace!("Received {} bytes from {}.", frame.len(), origin);
                node.received(origin, frame);
            }
            Ok(None) => break,
            Err(err) => {
                log::warn!("Connection to {} failed: {}", origin, err);
                break;
            }
        }
    }
}
