use serde::{
    de::{Error, Visitor},
    Deserializer, Serializer,
};
use std::fmt;

/// Serializes a byte array as a lowercase hex string and reads it back.
///
/// The first field names the type in error messages, the second is the
/// expected number of bytes.
#[derive(Copy, Clone)]
pub struct HexArrayHelper(pub &'static str, pub usize);

impl HexArrayHelper {
    /// Serialize `data` as a hex string.
    pub fn serialize<S>(self, serializer: S, data: &[u8]) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        debug_assert_eq!(data.len(), self.1);
        serializer.serialize_str(&hex::encode(data))
    }

    /// Deserialize a hex string into `data`, which must be `self.1` bytes long.
    pub fn deserialize<'de, D>(self, deserializer: D, data: &mut [u8]) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(HexArrayVisitor(self.0, data))
    }
}

////////////////////////////////////////////////////////////////////////////////

struct HexArrayVisitor<'a>(&'static str, &'a mut [u8]);

impl<'de, 'a> Visitor<'de> for HexArrayVisitor<'a> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a {} as hex string of {} bytes",
            self.0,
            self.1.len()
        )
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        hex::decode_to_slice(value, self.1)
            .map_err(|err| E::custom(format_args!("invalid {}: {}", self.0, err)))
    }
}
