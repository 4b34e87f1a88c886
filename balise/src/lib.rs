#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::similar_names)]
#![allow(clippy::future_not_send)]

//! A balise is the transponder between the rails that hands telegrams to a
//! passing train. This crate hands JSON telegrams between nodes.
//!
//! Its parts are:
//!
//! - [`frame`](frame/index.html) reads and writes length prefixed frames,
//! - [`FrameSender`](struct.FrameSender.html) queues frames for a long lived duplex peer connection,
//! - [`define_api!`](macro.define_api.html), [`client`](client/index.html) and
//!   [`server`](server/index.html) build a typed request/response API on top.
//!
//! ## Example
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! // ---------------- Define API definition ----------------
//! use balise::define_api;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Pong;
//!
//! define_api! {
//!     mod ping_message; // give a module name for all requests
//!     pub enum PingAPIMessage {
//!         Ping => Pong,
//!         Add(usize, usize) => usize,
//!     }
//! }
//!
//! // ---------------- Define API server ----------------
//! use balise::{
//!     client::Client,
//!     server::{Handler, Response, Server, ServerRequest},
//!     Address, BoxError,
//! };
//! use futures::future::BoxFuture;
//! use std::net::SocketAddr;
//! use tokio::net::TcpListener;
//!
//! #[derive(Clone)]
//! struct PingAPIServer;
//!
//! impl Handler<PingAPIMessage> for PingAPIServer {
//!     fn handle(
//!         &self,
//!         _addr: &SocketAddr,
//!         req: PingAPIMessage,
//!     ) -> BoxFuture<'_, Result<Response, BoxError>> {
//!         Box::pin(async move {
//!             match req {
//!                 PingAPIMessage::Ping(params) => params.response(Pong),
//!                 PingAPIMessage::Add(params) => params.response(params.0 + params.1),
//!             }
//!         })
//!     }
//! }
//!
//! // ---------------- Start server and send request ----------------
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
//!     let peer_addr: Address = listener.local_addr().unwrap().into();
//!
//!     tokio::spawn(async move {
//!         Server::new(PingAPIServer).serve(&listener).await.unwrap();
//!     });
//!
//!     // use a client to execute some requests
//!     let mut client = Client::<PingAPIMessage>::new(peer_addr);
//!     match client.send_request(ping_message::Add(1, 2)).await {
//!         Err(err) => log::error!("Failed to add: {}", err),
//!         Ok(res) => log::debug!("1 + 2 = {}", res),
//!     }
//! }
//! ```

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

pub mod frame;

mod address;
mod error;
mod macros;
mod sender;

pub use address::{Address, Host};
pub use error::Error;
pub use sender::FrameSender;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A boxed error that can cross task boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A request to the API always has a specific response type.
///
/// All Variants of a message enum `T` must implement this trait
/// (is done automatically when using the [`define_api!`](macro.define_api.html)-macro).
/// This allows a message `M` which implements `Request<T>` to be converted to one of the enum variants (via `Into<T>`).
/// And the implementation can ensure that the response is of type `M::Response`.
pub trait Request<T>: Serialize + Into<T> + Debug + Clone + Send + 'static {
    /// The type of the response.
    type Response: Serialize + DeserializeOwned + Debug + Send + 'static;
}
