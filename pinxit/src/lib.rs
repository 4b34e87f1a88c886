#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::similar_names)]

//! Cryptographic identities and signatures.
//!
//! An `Identity` is a key pair that can sign, a `PeerId` is the public half
//! that verifies. Everything that should be signed implements `Signable`;
//! code that only needs to *produce* signatures can depend on the
//! object-safe `Signer` trait instead of a concrete key type.
//!
//! ```
//! use pinxit::{Identity, Signable};
//!
//! // define example struct
//! struct TestData(String);
//!
//! // make the struct signable
//! impl<'a> Signable for &'a TestData {
//!     type SignableData = &'a str;
//!     type Error = std::io::Error; // never used
//!     fn signable_data(&self) -> Result<Self::SignableData, Self::Error> {
//!         Ok(&self.0)
//!     }
//! }
//!
//! // create an identity
//! let identity = Identity::generate();
//!
//! // create signable test data
//! let test_data = TestData("Lorem ipsum".to_string());
//!
//! // create a signature
//! let signature = identity.sign(&test_data).unwrap();
//!
//! // get peer id of identity
//! let peer_id = identity.id();
//!
//! // verify the signature
//! peer_id.verify(&test_data, &signature).unwrap();
//!
//! // a different identity does not verify
//! let other = Identity::generate();
//! assert!(other.id().verify(&test_data, &signature).is_err());
//! ```

mod error;
mod identity;
mod peer_id;
mod signable;
mod signature;

pub use error::Error;
pub use identity::Identity;
pub use peer_id::PeerId;
pub use signable::{Signable, Signer};
pub use signature::Signature;
