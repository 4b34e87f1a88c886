use balise::{
    frame::{read_frame, write_frame, MAX_FRAME_LEN},
    Error, FrameSender,
};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn frames_keep_their_boundaries() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    write_frame(&mut client, br#"{"type":"add"}"#).await.unwrap();
    write_frame(&mut client, b"").await.unwrap();
    write_frame(&mut client, br#"{"type":"sync"}"#).await.unwrap();
    drop(client);

    assert_eq!(
        read_frame(&mut server).await.unwrap().unwrap(),
        br#"{"type":"add"}"#
    );
    assert_eq!(read_frame(&mut server).await.unwrap().unwrap(), b"");
    assert_eq!(
        read_frame(&mut server).await.unwrap().unwrap(),
        br#"{"type":"sync"}"#
    );
    assert!(read_frame(&mut server).await.unwrap().is_none());
}

#[tokio::test]
async fn oversized_length_is_refused() {
    let (mut client, mut server) = tokio::io::duplex(64);

    let len = (MAX_FRAME_LEN as u32) + 1;
    client.write_all(&len.to_le_bytes()).await.unwrap();

    assert!(matches!(
        read_frame(&mut server).await,
        Err(Error::MessageTooLong)
    ));
}

#[tokio::test]
async fn truncated_frame_is_an_error() {
    let (mut client, mut server) = tokio::io::duplex(64);

    client.write_all(&10_u32.to_le_bytes()).await.unwrap();
    client.write_all(b"abc").await.unwrap();
    drop(client);

    assert!(matches!(read_frame(&mut server).await, Err(Error::IO(_))));
}

#[tokio::test]
async fn sender_writes_queued_frames_in_order() {
    let (client, mut server) = tokio::io::duplex(1024);
    let sender = FrameSender::spawn(client);

    assert!(sender.send(b"one".to_vec()));
    assert!(sender.send(b"[1,2,3]".to_vec()));

    assert_eq!(read_frame(&mut server).await.unwrap().unwrap(), b"one");
    assert_eq!(read_frame(&mut server).await.unwrap().unwrap(), b"[1,2,3]");
}
