use err_derive::Error;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error of the `pinxit` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invalid hexadecimal value was used.
    #[error(display = "invalid hex: {}", _0)]
    InvalidHex(#[error(from)] blocksberg::FromHexError),

    /// An invalid signature or public key was used.
    #[error(display = "invalid signature: {}", _0)]
    SignatureError(#[error(from)] ed25519_dalek::SignatureError),

    /// A `Signable` failed to create a message.
    #[error(display = "unable to create signable message: {}", _0)]
    SignableError(BoxError),

    /// A key file could not be read or written.
    #[error(display = "key file: {}", _0)]
    Io(#[error(from)] std::io::Error),
}

impl Error {
    pub(crate) fn signable_error(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::SignableError(err.into())
    }
}
