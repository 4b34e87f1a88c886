//! A server for communicating between nodes.

use super::read_frames;
use crate::{
    node::{NodeHandle, Origin},
    BoxError,
};
use balise::FrameSender;
use tokio::net::{TcpListener, TcpStream};

/// Accepts downstream peers.
#[derive(Clone)]
pub struct Receiver {
    node: NodeHandle,
}

impl Receiver {
    /// Create a new receiver instance.
    #[must_use]
    pub const fn new(node: NodeHandle) -> Self {
        Self { node }
    }

    /// The main server loop.
    pub async fn serve(self, listener: TcpListener) -> Result<(), BoxError> {
        log::info!(
            "Peer receiver is now listening on Port {}",
            listener.local_addr()?.port()
        );
        loop {
            let (stream, addr) = listener.accept().await?;
            log::debug!("Peer connected from {}.", addr);
            self.handle_peer(stream);
        }
    }

    fn handle_peer(&self, stream: TcpStream) {
        let (reader, writer) = stream.into_split();
        let id = self.node.connected(FrameSender::spawn(writer));

        let node = self.node.clone();
        tokio::spawn(async move {
            read_frames(reader, Origin::Downstream(id), &node).await;
            node.disconnected(id);
        });
    }
}
