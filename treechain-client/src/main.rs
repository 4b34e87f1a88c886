#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::future_not_send,
    clippy::missing_errors_doc,
    clippy::similar_names
)]

//! A command line client for a treechain node.

mod cli;

use cli::{cmd, Cmd, Opt};
use std::process;
use structopt::StructOpt;
use treechain_client::Client;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let opt = Opt::from_args();
    log::debug!("Command line arguments: {:#?}", opt);

    let mut client = Client::new(opt.api);
    let result = match opt.cmd {
        Cmd::Ping => main_ping(&mut client).await,
        Cmd::Submit(cmd) => main_submit(&mut client, cmd).await,
        Cmd::Chain => main_chain(&mut client).await,
        Cmd::Verify(cmd) => main_verify(&mut client, cmd).await,
        Cmd::Validate => main_validate(&mut client).await,
    };

    if let Err(err) = result {
        log::error!("{}", err);
        process::exit(1);
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn main_ping(client: &mut Client) -> Result<(), BoxError> {
    client.ping().await?;
    println!("pong");
    Ok(())
}

async fn main_submit(client: &mut Client, cmd: cmd::Submit) -> Result<(), BoxError> {
    let cmd::Submit { name, payload } = cmd;
    let entry = client.submit_entry(name, payload).await?;
    log::info!("Created block {} ({}).", entry.block.index, entry.block.hash);
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

async fn main_chain(client: &mut Client) -> Result<(), BoxError> {
    let chain = client.chain().await?;
    println!("{}", serde_json::to_string_pretty(&chain)?);
    Ok(())
}

async fn main_verify(client: &mut Client, cmd: cmd::Verify) -> Result<(), BoxError> {
    let cmd::Verify { hash, owner } = cmd;
    match client.verify_ownership(hash, owner).await? {
        Some(true) => println!("owner verified"),
        Some(false) => {
            println!("not the owner");
            process::exit(2);
        }
        None => return Err(format!("unknown block {}", hash).into()),
    }
    Ok(())
}

async fn main_validate(client: &mut Client) -> Result<(), BoxError> {
    if client.validate_chain().await? {
        println!("chain is valid");
        Ok(())
    } else {
        Err("chain is invalid".into())
    }
}
