use crate::{PeerId, Signature};
use std::error::Error as StdError;

/// A `Signable` is something that can be signed.
///
/// ```
/// use pinxit::Signable;
/// use std::io;
///
/// // ---------------- Sign by creating a Vec ----------------
/// struct SignCreateVec(u8, u8);
///
/// impl Signable for SignCreateVec {
///     type SignableData = Vec<u8>;
///     type Error = io::Error;
///     fn signable_data(&self) -> Result<Self::SignableData, Self::Error> {
///         Ok(vec![self.0, self.1])
///     }
/// }
///
/// // ---------------- Sign by returning a reference ----------------
/// struct SignString(String);
///
/// impl<'a> Signable for &'a SignString {
///     type SignableData = &'a str;
///     type Error = io::Error;
///     fn signable_data(&self) -> Result<Self::SignableData, Self::Error> {
///         Ok(&self.0)
///     }
/// }
///
/// fn test_signable(message: impl Signable, expected: impl AsRef<[u8]>) {
///     assert_eq!(message.signable_data().unwrap().as_ref(), expected.as_ref());
/// }
///
/// test_signable(SignCreateVec(4, 2), [4, 2]);
/// test_signable(&SignString("42".to_string()), [b'4', b'2']);
/// ```
pub trait Signable: Sized {
    /// The type for representing signable data.
    type SignableData: AsRef<[u8]>;

    /// The type of error that can occur while creating the signable data.
    type Error: StdError + Send + Sync + 'static;

    /// Create a signable representation from self.
    fn signable_data(&self) -> Result<Self::SignableData, Self::Error>;
}

impl<'a, S> Signable for &'a S
where
    S: Signable,
{
    type SignableData = S::SignableData;
    type Error = S::Error;
    fn signable_data(&self) -> Result<Self::SignableData, Self::Error> {
        S::signable_data(self)
    }
}

/// Produces signatures in the name of a `PeerId`.
///
/// This is the only capability a block author needs. `Identity` is the real
/// implementation; tests can provide their own to simulate forged keys.
///
/// ```
/// use pinxit::{Identity, Signer};
///
/// fn sign_twice(signer: &dyn Signer, data: &[u8]) -> bool {
///     signer.sign_bytes(data) == signer.sign_bytes(data)
/// }
///
/// let identity = Identity::generate();
/// assert!(sign_twice(&identity, b"ed25519 is deterministic"));
/// ```
pub trait Signer {
    /// The `PeerId` that should verify the produced signatures.
    fn id(&self) -> &PeerId;

    /// Sign raw bytes.
    fn sign_bytes(&self, data: &[u8]) -> Signature;
}
