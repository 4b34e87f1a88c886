use crate::Error;
use blocksberg::HexArrayHelper;
use std::{fmt, str::FromStr};

const SIGNATURE_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// The cryptographic signature of some `Signable` data.
///
/// The bytes are only interpreted as a curve point when verified, so any
/// 64 bytes survive a round trip through the wire format.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub(crate) [u8; SIGNATURE_LEN]);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        blocksberg::write_hex!(f, &self.0, SIGNATURE_LEN)
    }
}

impl FromStr for Signature {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Signature {
    /// Create a signature from it's hexadecimal representation.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let mut signature = [0; SIGNATURE_LEN];
        blocksberg::decode_hex(hex.trim(), &mut signature)?;
        Ok(Self(signature))
    }

    /// Create a hexadecimal representation.
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(&self.0[..])
    }
}

// hex string serde implementation
const _: () = {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const SIGNATURE_HELPER: HexArrayHelper = HexArrayHelper("Signature", SIGNATURE_LEN);

    impl Serialize for Signature {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            SIGNATURE_HELPER.serialize(serializer, &self.0)
        }
    }

    impl<'de> Deserialize<'de> for Signature {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let mut signature = Self([0; SIGNATURE_LEN]);
            SIGNATURE_HELPER.deserialize(deserializer, &mut signature.0)?;
            Ok(signature)
        }
    }
};
