//! A server for communicating with clients.

use crate::{node::NodeHandle, BoxError};
use balise::server::{Handler, Response, Server, ServerRequest};
use futures::future::BoxFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use treechain_client_api::{ClientMessage, Pong};

/// Answers requests of clients by asking the node.
///
/// # Example
///
/// ```no_run
/// use pinxit::Identity;
/// use serde_json::json;
/// use tokio::net::TcpListener;
/// use treechain::{chain::Chain, node::Node, turi::Turi};
///
/// # #[tokio::main]
/// # async fn main() {
/// let node = Node::new(Chain::new(Identity::generate(), json!("Genesis Block"))).spawn();
/// let listener = TcpListener::bind("127.0.0.1:3100").await.unwrap();
/// Turi::new(node).serve(&listener).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct Turi {
    node: NodeHandle,
}

impl Turi {
    /// Create a new turi instance.
    #[must_use]
    pub const fn new(node: NodeHandle) -> Self {
        Self { node }
    }

    /// The main server loop.
    pub async fn serve(self, listener: &TcpListener) -> Result<(), BoxError> {
        Server::new(self).serve(listener).await
    }
}

impl Handler<ClientMessage> for Turi {
    fn handle(
        &self,
        addr: &SocketAddr,
        req: ClientMessage,
    ) -> BoxFuture<'_, Result<Response, BoxError>> {
        let addr = *addr;
        Box::pin(async move {
            match req {
                ClientMessage::Ping(params) => params.response(Pong),
                ClientMessage::SubmitEntry(params) => {
                    log::info!("Client {} submits entry {:?}.", addr, params.0);
                    let entry = self
                        .node
                        .submit_entry(params.0.clone(), params.1.clone())
                        .await?;
                    params.response(entry)
                }
                ClientMessage::GetChain(params) => params.response(self.node.chain().await?),
                ClientMessage::VerifyOwnership(params) => {
                    let result = self
                        .node
                        .verify_ownership(params.0, params.1.clone())
                        .await?;
                    params.response(result)
                }
                ClientMessage::ValidateChain(params) => {
                    params.response(self.node.validate().await?)
                }
            }
        })
    }
}
