use crate::{Error, PeerId, Signable, Signature, Signer};
use ed25519_dalek::{Signer as _, SigningKey};
use std::{fmt, fs, path::Path};

const SECRET_LEN: usize = ed25519_dalek::SECRET_KEY_LENGTH;

/// A cryptographic identity contains a public and private key to sign messages.
///
/// Whoever holds an `Identity` may sign in its name: the key is a bearer secret.
#[derive(Clone)]
pub struct Identity {
    id: PeerId,
    secret: SigningKey,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Identity").field("id", &self.id).finish()
    }
}

impl Identity {
    fn from_secret_key(secret: SigningKey) -> Self {
        let id = PeerId(secret.verifying_key());
        Self { id, secret }
    }

    /// Create an identity from it's hexadecimal representation.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let mut bytes = [0; SECRET_LEN];
        blocksberg::decode_hex(hex.trim(), &mut bytes)?;
        Ok(Self::from_secret_key(SigningKey::from_bytes(&bytes)))
    }

    /// Generate a new random identity.
    #[must_use]
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_secret_key(secret)
    }

    /// Load an identity from a file containing the hex encoded secret key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let hex = fs::read_to_string(path)?;
        Self::from_hex(&hex)
    }

    /// Write the hex encoded secret key to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.hex())?;
        Ok(())
    }

    /// Get the id of the identity.
    #[must_use]
    pub const fn id(&self) -> &PeerId {
        &self.id
    }

    /// Create a hexadecimal representation of the secret key.
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(self.secret.to_bytes())
    }

    /// Create a signature of a `message` that implements `Signable`.
    pub fn sign<S>(&self, message: S) -> Result<Signature, Error>
    where
        S: Signable,
    {
        let data = message.signable_data().map_err(Error::signable_error)?;
        Ok(self.sign_bytes(data.as_ref()))
    }
}

impl Signer for Identity {
    fn id(&self) -> &PeerId {
        &self.id
    }

    fn sign_bytes(&self, data: &[u8]) -> Signature {
        Signature(self.secret.sign(data).to_bytes())
    }
}
