//! Configuration of a node.
//!
//! Values given on the command line win over values from the config file.

use balise::Address;
use err_derive::Error;
use pinxit::Identity;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_PORT: u16 = 3100;
const DEFAULT_GENESIS: &str = "Genesis Block";

/// An error while loading the configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file could not be read.
    #[error(display = "Could not read {:?}: {}", 0, 1)]
    Read(PathBuf, #[error(source)] std::io::Error),

    /// The config file is not valid.
    #[error(display = "{}", 0)]
    Toml(#[error(from)] toml::de::Error),

    /// The upstream address in the config file is not valid.
    #[error(display = "Invalid upstream address {:?}: {}", 0, 1)]
    Upstream(String, #[error(source)] std::io::Error),

    /// The authority key could not be loaded or created.
    #[error(display = "Authority key: {}", 0)]
    AuthorityKey(#[error(from)] pinxit::Error),
}

/// Command line arguments of a node.
#[derive(StructOpt, Debug, Default)]
#[structopt(name = "treechain")]
pub struct Opt {
    /// The port to accept downstream peers on [default: 3000].
    #[structopt(short, long)]
    pub port: Option<u16>,

    /// The port of the client API [default: 3100].
    #[structopt(long)]
    pub api_port: Option<u16>,

    /// The parent node (`host:port`). Without it this node is the authority.
    #[structopt(short, long)]
    pub upstream: Option<Address>,

    /// A file holding the hex encoded authority key. Created if missing.
    #[structopt(long, parse(from_os_str))]
    pub authority_key: Option<PathBuf>,

    /// The payload of the genesis block [default: "Genesis Block"].
    #[structopt(long)]
    pub genesis: Option<String>,

    /// Log more (-v: debug, -vv: trace).
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    /// A TOML file with default values for all options.
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,
}

/// The contents of a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    /// See `Opt::port`.
    pub port: Option<u16>,
    /// See `Opt::api_port`.
    pub api_port: Option<u16>,
    /// See `Opt::upstream`.
    pub upstream: Option<String>,
    /// See `Opt::authority_key`.
    pub authority_key: Option<PathBuf>,
    /// See `Opt::genesis`.
    pub genesis: Option<String>,
}

impl FileConfig {
    /// Read a config file.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let data = fs::read_to_string(path).map_err(|err| Error::Read(path.to_owned(), err))?;
        Ok(toml::from_str(&data)?)
    }
}

/// The configuration of a node. Read once at startup.
///
/// ```
/// use treechain::config::{Config, FileConfig, Opt};
///
/// let opt = Opt { port: Some(4000), ..Opt::default() };
/// let file: FileConfig = toml::from_str("port = 5000\napi-port = 5100").unwrap();
///
/// let config = Config::merge(opt, file).unwrap();
/// assert_eq!(config.port, 4000);
/// assert_eq!(config.api_port, 5100);
/// assert_eq!(config.genesis, "Genesis Block");
/// assert!(config.upstream.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// The port to accept downstream peers on.
    pub port: u16,
    /// The port of the client API.
    pub api_port: u16,
    /// The parent node, `None` on the authority.
    pub upstream: Option<Address>,
    /// The authority key file.
    pub authority_key: Option<PathBuf>,
    /// The payload of the genesis block.
    pub genesis: String,
}

impl Config {
    /// Build the configuration from the command line and the optional config file.
    pub fn load(opt: Opt) -> Result<Self, Error> {
        let file = match &opt.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::merge(opt, file)
    }

    /// Layer the command line over a config file.
    pub fn merge(opt: Opt, file: FileConfig) -> Result<Self, Error> {
        let upstream = match (opt.upstream, file.upstream) {
            (Some(upstream), _) => Some(upstream),
            (None, Some(upstream)) => Some(
                upstream
                    .parse()
                    .map_err(|err| Error::Upstream(upstream.clone(), err))?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            port: opt.port.or(file.port).unwrap_or(DEFAULT_PORT),
            api_port: opt.api_port.or(file.api_port).unwrap_or(DEFAULT_API_PORT),
            upstream,
            authority_key: opt.authority_key.or(file.authority_key),
            genesis: opt
                .genesis
                .or(file.genesis)
                .unwrap_or_else(|| DEFAULT_GENESIS.to_string()),
        })
    }

    /// Whether this node is the root of the tree and creates the chain.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.upstream.is_none()
    }

    /// Load the authority key.
    ///
    /// A configured key file is created if it does not exist yet. Without a
    /// key file the root uses a key that only lives as long as the process.
    pub fn authority(&self) -> Result<Option<Identity>, Error> {
        match &self.authority_key {
            Some(path) if path.exists() => {
                log::info!("Loading authority key from {:?}.", path);
                Ok(Some(Identity::load(path)?))
            }
            Some(path) => {
                let identity = Identity::generate();
                identity.save(path)?;
                log::info!("Created authority key {} in {:?}.", identity.id(), path);
                Ok(Some(identity))
            }
            None if self.is_root() => {
                let identity = Identity::generate();
                log::warn!("Using an ephemeral authority key {}.", identity.id());
                Ok(Some(identity))
            }
            None => Ok(None),
        }
    }
}

/// The log filter for a number of `-v` flags.
#[must_use]
pub const fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
