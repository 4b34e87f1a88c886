use super::read_frames;
use crate::node::{NodeHandle, Origin};
use balise::{client, Address, FrameSender};

/// Connect to the parent node and hand the connection to `node`.
///
/// Connecting is retried for a few seconds. Once connected, the parent
/// sends its chain and the connection stays open until either side closes it.
pub async fn connect_upstream(addr: &Address, node: NodeHandle) -> Result<(), balise::Error> {
    log::info!("Connecting to upstream at {}.", addr);
    let stream = client::connect(addr).await?;
    let (reader, writer) = stream.into_split();
    node.upstream_connected(FrameSender::spawn(writer));

    let addr = addr.clone();
    tokio::spawn(async move {
        read_frames(reader, Origin::Upstream, &node).await;
        log::warn!("Upstream {} closed the connection.", addr);
        node.upstream_lost();
    });
    Ok(())
}
