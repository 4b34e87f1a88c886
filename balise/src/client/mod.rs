//! A client for a request/response API.

use crate::{
    frame::{read_frame, write_frame},
    Address, Error, Request,
};
use serde::Serialize;
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};
use tokio::net::TcpStream;

/// A client instance.
///
/// The client keeps its connection open between requests and reconnects
/// after a failure.
pub struct Client<T> {
    addr: Address,
    stream: Option<TcpStream>,
    request_data: PhantomData<fn(T)>,
}

impl<T> Client<T> {
    /// Create a new client instance.
    ///
    /// # Example
    ///
    /// ```
    /// use balise::client::Client;
    ///
    /// let addr = "127.0.0.1:2480".parse().unwrap();
    /// let client = Client::<()>::new(addr);
    /// ```
    #[must_use]
    pub const fn new(addr: Address) -> Self {
        Self {
            addr,
            stream: None,
            request_data: PhantomData,
        }
    }

    /// Send a request to the server specified.
    pub async fn send_request<Req>(&mut self, req: Req) -> Result<Req::Response, Error>
    where
        Req: Request<T>,
        T: Serialize,
    {
        log::trace!("Sending request to {}: {:?}", self.addr, req);
        let result = self.round_trip(req).await;
        if result.is_err() {
            // the connection may be in an undefined state
            self.stream = None;
        }
        let res = result?;
        log::trace!("Received response from {}: {:?}", self.addr, res);
        Ok(res)
    }

    async fn round_trip<Req>(&mut self, req: Req) -> Result<Req::Response, Error>
    where
        Req: Request<T>,
        T: Serialize,
    {
        let req: T = req.into();
        let data = serde_json::to_vec(&req)?;

        let stream = self.stream().await?;
        write_frame(stream, &data).await?;
        let buf = read_frame(stream).await?.ok_or(Error::ConnectionClosed)?;

        let res: Result<serde_json::Value, String> = serde_json::from_slice(&buf)?;
        Ok(serde_json::from_value(res?)?)
    }

    /// Get a working TCP stream.
    ///
    /// Connecting is retried for a few seconds before giving up.
    async fn stream(&mut self) -> Result<&mut TcpStream, Error> {
        if self.stream.is_none() {
            self.stream = Some(connect(&self.addr).await?);
        }
        self.stream.as_mut().ok_or(Error::ConnectionClosed)
    }
}

/// Connect to `addr`, retrying once per second until a deadline of three seconds.
pub async fn connect(addr: &Address) -> Result<TcpStream, Error> {
    connect_with_deadline(addr, Duration::from_secs(3)).await
}

/// Connect to `addr`, retrying once per second until `timeout` has passed.
pub async fn connect_with_deadline(addr: &Address, timeout: Duration) -> Result<TcpStream, Error> {
    let deadline = Instant::now() + timeout;
    let delay = Duration::from_secs(1);

    loop {
        match addr.connect().await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                if Instant::now() + delay > deadline {
                    log::warn!("Couldn't connect to server at {}: {}", addr, err);
                    return Err(Error::Timeout(addr.clone()));
                }
                log::warn!(
                    "Couldn't connect to server at {}, retrying in {:?}: {}",
                    addr,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
