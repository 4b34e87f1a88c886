#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]

//! Helpers for fixed-size byte arrays that travel as hex strings.
//!
//! ```
//! use blocksberg::HexArrayHelper;
//! use serde::{Deserialize, Deserializer, Serialize, Serializer};
//! use std::fmt;
//!
//! struct Tag([u8; 4]);
//!
//! const TAG_HELPER: HexArrayHelper = HexArrayHelper("Tag", 4);
//!
//! impl fmt::Display for Tag {
//!     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
//!         blocksberg::write_hex!(f, &self.0, 4)
//!     }
//! }
//!
//! impl Serialize for Tag {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         TAG_HELPER.serialize(serializer, &self.0)
//!     }
//! }
//!
//! impl<'de> Deserialize<'de> for Tag {
//!     fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
//!         let mut tag = Tag([0; 4]);
//!         TAG_HELPER.deserialize(deserializer, &mut tag.0)?;
//!         Ok(tag)
//!     }
//! }
//!
//! let tag = Tag([0xde, 0xad, 0xbe, 0xef]);
//! assert_eq!(tag.to_string(), "deadbeef");
//! assert_eq!(serde_json::to_string(&tag).unwrap(), "\"deadbeef\"");
//! let back: Tag = serde_json::from_str("\"deadbeef\"").unwrap();
//! assert_eq!(back.0, tag.0);
//! ```

mod serde;
pub use crate::serde::HexArrayHelper;

/// Decode a hex string into a fixed-size byte slice.
///
/// Fails if the string has the wrong length or contains non-hex characters.
pub fn decode_hex(hex: impl AsRef<[u8]>, out: &mut [u8]) -> Result<(), hex::FromHexError> {
    hex::decode_to_slice(hex, out)
}

/// Write a byte array of length `$len` as lowercase hex into a formatter.
#[macro_export]
macro_rules! write_hex {
    ($f:ident, $data:expr, $len:expr) => {{
        let data: &[u8; $len] = $data;
        let data: &[u8] = data;
        let out = &mut [0; $len * 2];
        $crate::private::encode_to_slice(data, out).unwrap();
        $f.write_str(::std::str::from_utf8(out).unwrap())
    }};
}

#[doc(hidden)]
pub mod private {
    pub use hex::encode_to_slice;
}

pub use hex::FromHexError;
