//! Length prefixed frames.
//!
//! Every frame is a little endian `u32` length followed by that many bytes.

use crate::Error;
use std::{convert::TryInto, io};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The largest frame that is accepted in either direction (16 MiB).
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Read the next frame.
///
/// Returns `Ok(None)` if the stream ended cleanly before a new frame started.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use balise::frame::{read_frame, write_frame};
///
/// let (mut client, mut server) = tokio::io::duplex(64);
/// write_frame(&mut client, b"hello").await.unwrap();
/// drop(client);
///
/// assert_eq!(read_frame(&mut server).await.unwrap().unwrap(), b"hello");
/// assert!(read_frame(&mut server).await.unwrap().is_none());
/// # }
/// ```
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncRead + Unpin,
{
    // read message length
    let mut len_buf = [0; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::MessageTooLong);
    }

    // read message
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

/// Write a single frame and flush the writer.
pub async fn write_frame<W>(writer: &mut W, data: &[u8]) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    if data.len() > MAX_FRAME_LEN {
        return Err(Error::MessageTooLong);
    }
    let size: u32 = data.len().try_into().map_err(|_| Error::MessageTooLong)?;
    writer.write_all(&size.to_le_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}
