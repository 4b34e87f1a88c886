use balise::Address;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "treechain-client")]
pub struct Opt {
    /// The API address of the node.
    #[structopt(short, long, default_value = "localhost:3100")]
    pub api: Address,

    #[structopt(subcommand)]
    pub cmd: Cmd,
}

#[derive(StructOpt, Debug)]
pub enum Cmd {
    /// Check that the node answers.
    Ping,
    /// Append an entry (authority node only).
    Submit(cmd::Submit),
    /// Print the whole chain.
    Chain,
    /// Check the owner claim of a block.
    Verify(cmd::Verify),
    /// Let the node recheck its chain.
    Validate,
}

pub mod cmd {
    use pinxit::PeerId;
    use serde_json::Value;
    use structopt::StructOpt;
    use treechain_client_api::BlockHash;

    /// Append an entry.
    #[derive(StructOpt, Debug)]
    pub struct Submit {
        /// The name of the entry.
        pub name: String,
        /// The payload as JSON.
        #[structopt(parse(try_from_str = serde_json::from_str))]
        pub payload: Value,
    }

    /// Check an owner claim.
    #[derive(StructOpt, Debug)]
    pub struct Verify {
        /// The hash of the block.
        pub hash: BlockHash,
        /// The public key of the claimed owner.
        pub owner: PeerId,
    }
}
