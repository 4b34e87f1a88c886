//! Create a key pair for a node or an owner:
//!
//! `cargo run --bin gen-key <path>`
//!
//! writes the secret key to `<path>.key` and the public key to `<path>.pub`.

use pinxit::Identity;
use std::{env::args, fs, process};

fn main() {
    let path = match args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: gen-key <path>");
            process::exit(2);
        }
    };

    let identity = Identity::generate();
    let result = identity
        .save(format!("{}.key", path))
        .and_then(|()| Ok(fs::write(format!("{}.pub", path), identity.id().hex())?));
    if let Err(err) = result {
        eprintln!("Could not write key pair {}: {}", path, err);
        process::exit(1);
    }
    println!("{}", identity.id());
}
