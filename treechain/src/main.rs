#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::similar_names)]

//! The `treechain` node.
//!
//! Without `--upstream` the node is the root: it creates the chain and
//! signs every block. With `--upstream` it joins an existing tree below
//! the given node.

use futures::future;
use serde_json::json;
use std::{env, process};
use structopt::StructOpt;
use tokio::net::TcpListener;
use treechain::{
    chain::Chain,
    config::{self, Config, Opt},
    node::Node,
    peer::{self, Receiver},
    turi::Turi,
    BoxError,
};

#[tokio::main]
async fn main() {
    let opt = Opt::from_args();
    init_logger(opt.verbose);
    log::debug!("Command line arguments: {:#?}", opt);

    let config = match Config::load(opt) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(config).await {
        log::error!("{}", err);
        process::exit(1);
    }
    log::info!("Node stopped. Bye.");
}

fn init_logger(verbose: u8) {
    if env::var_os("RUST_LOG").is_some() {
        pretty_env_logger::init();
    } else {
        pretty_env_logger::formatted_builder()
            .parse_filters(config::log_filter(verbose))
            .init();
    }
}

async fn run(config: Config) -> Result<(), BoxError> {
    log::debug!("Configuration: {:#?}", config);
    let authority = config.authority()?;

    let chain = match authority {
        Some(identity) if config.is_root() => {
            log::info!("Starting as authority {}.", identity.id());
            Chain::new(identity, json!(config.genesis))
        }
        authority => Chain::empty(authority),
    };
    let node = Node::new(chain).spawn();

    let peer_listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let turi_listener = TcpListener::bind(("0.0.0.0", config.api_port)).await?;

    if let Some(upstream) = &config.upstream {
        peer::connect_upstream(upstream, node.clone()).await?;
    }

    // execute the turi in a new task
    let turi_task = {
        let node = node.clone();
        tokio::spawn(async move { Turi::new(node).serve(&turi_listener).await })
    };

    // execute the receiver in a new task
    let peer_receiver_task = tokio::spawn(Receiver::new(node).serve(peer_listener));

    // wait for all tasks
    future::join(
        async move {
            log::error!("Turi ended: {:?}", turi_task.await);
        },
        async move {
            log::error!("Peer receiver ended: {:?}", peer_receiver_task.await);
        },
    )
    .await;
    Ok(())
}
