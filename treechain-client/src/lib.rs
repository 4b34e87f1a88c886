#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::similar_names)]

//! A Library Crate for external clients of a treechain node.

mod client;

pub use client::Client;
pub use treechain_client_api::{Block, BlockHash, ChainSnapshot, SubmittedEntry};
