use crate::frame::write_frame;
use tokio::{io::AsyncWrite, sync::mpsc};

/// The sending half of a peer connection.
///
/// Frames are queued and written by a background task, so sending never
/// blocks the caller. Once the connection is gone every send is a no-op
/// that reports `false`.
#[derive(Debug, Clone)]
pub struct FrameSender {
    queue: mpsc::UnboundedSender<Vec<u8>>,
}

impl FrameSender {
    /// Spawn a writer task that drains the queue into `writer`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<W>(mut writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, mut queue) = Self::channel();
        tokio::spawn(async move {
            while let Some(frame) = queue.recv().await {
                if let Err(err) = write_frame(&mut writer, &frame).await {
                    log::warn!("Stopped writing to peer: {}", err);
                    break;
                }
            }
            log::trace!("Writer task finished.");
        });
        sender
    }

    /// Create a sender whose frames end up in the returned receiver.
    ///
    /// ```
    /// use balise::FrameSender;
    ///
    /// let (sender, mut frames) = FrameSender::channel();
    /// assert!(sender.send(b"ping".to_vec()));
    /// assert_eq!(frames.try_recv().unwrap(), b"ping");
    ///
    /// drop(frames);
    /// assert!(!sender.send(b"lost".to_vec()));
    /// ```
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (queue, receiver) = mpsc::unbounded_channel();
        (Self { queue }, receiver)
    }

    /// Queue a raw frame. Returns `false` if the peer is gone.
    pub fn send(&self, frame: Vec<u8>) -> bool {
        if self.queue.send(frame).is_ok() {
            true
        } else {
            log::debug!("Peer connection is closed, frame dropped.");
            false
        }
    }
}
