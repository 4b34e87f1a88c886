#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::doc_markdown
)]

//! A small replicated ledger.
//!
//! ## Overview
//!
//! `treechain` keeps an append-only chain of blocks in sync across nodes
//! that form a tree: every node has at most one upstream and any number of
//! downstream peers. The root node holds the authority key and is the only
//! one that creates blocks. Every other node checks the authority signature
//! and the links of each block before it appends and relays it.
//!
//! A block may also carry an owner signature, so whoever submitted an entry
//! can later prove the claim with the owner key they got back.

pub mod chain;
pub mod config;
pub mod message;
pub mod node;
pub mod peer;
pub mod turi;

/// A boxed error that can cross task boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
