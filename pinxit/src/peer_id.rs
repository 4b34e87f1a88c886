use crate::{Error, Signable, Signature};
use blocksberg::HexArrayHelper;
use ed25519_dalek::{Verifier, VerifyingKey};
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

const PUBLIC_LEN: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// The public half of an `Identity`.
///
/// A `PeerId` verifies signatures made by the matching `Identity`.
#[derive(Clone, PartialEq, Eq)]
pub struct PeerId(pub(crate) VerifyingKey);

impl Hash for PeerId {
    fn hash<H>(&self, h: &mut H)
    where
        H: Hasher,
    {
        self.0.as_bytes().hash(h)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        blocksberg::write_hex!(f, self.0.as_bytes(), PUBLIC_LEN)
    }
}

impl FromStr for PeerId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl PeerId {
    /// Create a `PeerId` from it's hexadecimal representation.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let mut bytes = [0; PUBLIC_LEN];
        blocksberg::decode_hex(hex.trim(), &mut bytes)?;
        Ok(Self(VerifyingKey::from_bytes(&bytes)?))
    }

    /// Create a hexadecimal representation.
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }

    /// Verify a `signature` of a `message` that implements `Signable`.
    pub fn verify<S>(&self, message: S, signature: &Signature) -> Result<(), Error>
    where
        S: Signable,
    {
        let data = message.signable_data().map_err(Error::signable_error)?;
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        Ok(self.0.verify(data.as_ref(), &signature)?)
    }
}

// hex string serde implementation
const _: () = {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    const PEER_ID_HELPER: HexArrayHelper = HexArrayHelper("PeerId", PUBLIC_LEN);

    impl Serialize for PeerId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            PEER_ID_HELPER.serialize(serializer, self.0.as_bytes())
        }
    }

    impl<'de> Deserialize<'de> for PeerId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let mut bytes = [0; PUBLIC_LEN];
            PEER_ID_HELPER.deserialize(deserializer, &mut bytes)?;
            VerifyingKey::from_bytes(&bytes)
                .map(Self)
                .map_err(D::Error::custom)
        }
    }
};
