//! A server for a request/response API.

use crate::{
    frame::{read_frame, write_frame},
    BoxError, Request,
};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::{fmt::Debug, marker::PhantomData, net::SocketAddr};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
};

/// The encoded response of a single request.
pub type Response = serde_json::Value;

/// A Server (server) instance.
pub struct Server<T, H> {
    request_data: PhantomData<fn() -> T>,
    handler: H,
}

impl<T, H> Clone for Server<T, H>
where
    H: Clone,
{
    fn clone(&self) -> Self {
        Self {
            request_data: PhantomData,
            handler: self.handler.clone(),
        }
    }
}

impl<T, H> Server<T, H>
where
    T: DeserializeOwned + Debug + Send + 'static,
    H: Handler<T> + Clone + Send + Sync + 'static,
{
    /// Create a new server instance.
    ///
    /// The `handler` answers every request received by the server.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            request_data: PhantomData,
            handler,
        }
    }

    /// The main server loop.
    ///
    /// Every connection is served by its own task; a connection can carry
    /// any number of requests, answered in order.
    pub async fn serve(self, listener: &TcpListener) -> Result<(), BoxError> {
        log::info!(
            "Server is now listening on Port {}",
            listener.local_addr()?.port()
        );
        loop {
            let (stream, peer_addr) = listener.accept().await?;
            let clone_self = self.clone();

            // handle the client in a new task
            tokio::spawn(async move {
                log::debug!("API client connected: {}", peer_addr);
                match clone_self.handle_client(peer_addr, stream).await {
                    Ok(()) => log::debug!("API client disconnected: {}", peer_addr),
                    Err(err) => log::warn!("Server error with {}: {}", peer_addr, err),
                }
            });
        }
    }

    async fn handle_client<S>(self, addr: SocketAddr, mut stream: S) -> Result<(), BoxError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        while let Some(buf) = read_frame(&mut stream).await? {
            // handle the request
            let res = match self.handle_request(&addr, &buf).await {
                Ok(res) => Ok(res),
                Err(err) => Err(err.to_string()),
            };

            // serialize and send response
            let data = serde_json::to_vec(&res)?;
            write_frame(&mut stream, &data).await?;
        }
        Ok(())
    }

    async fn handle_request(&self, addr: &SocketAddr, req: &[u8]) -> Result<Response, BoxError> {
        // Deserialize request.
        let req: T = serde_json::from_slice(req)?;
        log::trace!("Received request from {}: {:?}", addr, req);
        // handle the actual request
        let res = self.handler.handle(addr, req).await;
        log::trace!("Send response to {}: {:?}", addr, res);
        res
    }
}

/// Handles a request and returns the corresponding response.
pub trait Handler<T> {
    /// Handle the request.
    fn handle(&self, addr: &SocketAddr, req: T) -> BoxFuture<'_, Result<Response, BoxError>>;
}

/// Encodes the response of a request.
///
/// Only a value of the request's own `Response` type is accepted, so a
/// handler cannot answer with the wrong type.
pub trait ServerRequest<T>: Request<T> + Sized {
    /// Encode `response` as the answer to this request.
    fn response(&self, response: Self::Response) -> Result<Response, BoxError> {
        Ok(serde_json::to_value(&response)?)
    }
}

impl<R, T> ServerRequest<T> for R where R: Request<T> {}
