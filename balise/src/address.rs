use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::Formatter,
    io,
    net::{IpAddr, SocketAddr},
    str::FromStr,
};
use tokio::net::TcpStream;
pub use url::Host;

/// An endpoint address
///
/// ```
/// use balise::{Address, Host};
///
/// let address: Address = "localhost:3000".parse().unwrap();
/// assert_eq!(address.host, Host::Domain("localhost".to_string()));
/// assert_eq!(address.port, 3000);
/// assert_eq!(address.to_string(), "localhost:3000");
///
/// assert!("localhost".parse::<Address>().is_err());
/// assert!("localhost:http".parse::<Address>().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Address {
    /// The hostname (either dns name or ip address)
    pub host: Host,
    /// The port number
    pub port: u16,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.host.fmt(f)?;
        f.write_str(":")?;
        f.write_str(&self.port.to_string())?;
        Ok(())
    }
}

impl FromStr for Address {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidInput, msg);

        let hostname_end = s
            .rfind(':')
            .ok_or_else(|| invalid(format!("missing port in address {:?}", s)))?;
        let host = Host::parse(&s[..hostname_end])
            .map_err(|err| invalid(format!("could not parse host in {:?}: {}", s, err)))?;
        let port = s[hostname_end + 1..]
            .parse()
            .map_err(|err| invalid(format!("could not parse port in {:?}: {}", s, err)))?;

        Ok(Self { host, port })
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        let host = match addr.ip() {
            IpAddr::V4(ip) => Host::Ipv4(ip),
            IpAddr::V6(ip) => Host::Ipv6(ip),
        };
        Self {
            host,
            port: addr.port(),
        }
    }
}

impl Address {
    /// Open a TCP connection to this address.
    pub async fn connect(&self) -> io::Result<TcpStream> {
        match &self.host {
            Host::Domain(domain) => TcpStream::connect((domain.as_str(), self.port)).await,
            Host::Ipv4(ip) => TcpStream::connect((*ip, self.port)).await,
            Host::Ipv6(ip) => TcpStream::connect((*ip, self.port)).await,
        }
    }
}
