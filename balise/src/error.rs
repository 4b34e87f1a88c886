use err_derive::Error;

/// An error of the `balise` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Timeout: Could not connect to the server.
    #[error(display = "Timeout: Could not connect to {}.", _0)]
    Timeout(crate::Address),

    /// The message is too long.
    #[error(display = "The message is too long.")]
    MessageTooLong,

    /// The remote end closed the connection.
    #[error(display = "The connection was closed.")]
    ConnectionClosed,

    /// An IO error.
    #[error(display = "{}", _0)]
    IO(#[error(from)] std::io::Error),

    /// An encoding error.
    #[error(display = "{}", _0)]
    Encoding(#[error(from)] serde_json::Error),

    /// A serverside error.
    #[error(display = "Server: {}", _0)]
    Server(#[error(from)] String),

    /// Any error :D.
    #[error(display = "{}", _0)]
    BoxError(#[error(from)] crate::BoxError),
}
