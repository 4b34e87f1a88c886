use balise::FrameSender;
use pinxit::Identity;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use treechain::{
    chain::{self, Chain},
    message::{Message, Payload},
    node::{ConnectionId, Error, Node, Origin},
};
use treechain_client_api::{Block, BlockHash};

type Frames = UnboundedReceiver<Vec<u8>>;

fn drain(frames: &mut Frames) -> Vec<Message> {
    let mut messages = Vec::new();
    while let Ok(frame) = frames.try_recv() {
        messages.push(Message::decode(&frame).unwrap());
    }
    messages
}

fn root() -> (Node, Identity) {
    let authority = Identity::generate();
    let node = Node::new(Chain::new(authority.clone(), json!("Genesis Block")));
    (node, authority)
}

fn connect_downstream(node: &mut Node) -> (ConnectionId, Frames) {
    let (sender, frames) = FrameSender::channel();
    let id = ConnectionId::next();
    node.connected(id, sender);
    (id, frames)
}

/// A follower that already received the chain of `root` from its upstream.
fn follower(root: &Node) -> (Node, Frames) {
    let mut node = Node::new(Chain::empty(None));
    let (sender, frames) = FrameSender::channel();
    node.upstream_connected(sender);
    node.handle_message(Origin::Upstream, Message::sync(root.chain().snapshot()));
    (node, frames)
}

fn frame(message: &Message) -> Vec<u8> {
    message.encode().unwrap()
}

#[test]
fn new_downstream_peer_gets_sync() {
    let (mut node, _) = root();
    node.submit_entry("a".to_string(), json!(1)).unwrap();

    let (_, mut frames) = connect_downstream(&mut node);
    let messages = drain(&mut frames);
    assert_eq!(messages.len(), 1);
    match &messages[0].payload {
        Payload::Sync(snapshot) => assert_eq!(snapshot, &node.chain().snapshot()),
        other => panic!("expected sync, got {:?}", other),
    }
}

#[test]
fn sync_replaces_the_chain() {
    let (mut root, authority) = root();
    root.submit_entry("a".to_string(), json!(1)).unwrap();

    let (follower, mut upstream) = follower(&root);
    assert_eq!(follower.chain().snapshot(), root.chain().snapshot());
    assert_eq!(follower.chain().authority_id(), Some(authority.id()));
    assert!(!follower.chain().is_authority());

    // a sync is never sent back upstream
    assert!(drain(&mut upstream).is_empty());
}

#[test]
fn upstream_sync_rebootstraps_downstream_peers() {
    let (mut root, _) = root();
    root.submit_entry("a".to_string(), json!(1)).unwrap();

    let mut middle = Node::new(Chain::empty(None));
    let (_, mut downstream) = connect_downstream(&mut middle);
    let (sender, mut upstream) = FrameSender::channel();
    middle.upstream_connected(sender);

    // the first bootstrap happened before the middle node had a chain
    match &drain(&mut downstream)[..] {
        [Message {
            payload: Payload::Sync(snapshot),
            ..
        }] => assert!(snapshot.blocks.is_empty()),
        other => panic!("expected an empty sync, got {:?}", other),
    }

    let snapshot = root.chain().snapshot();
    middle.handle_message(Origin::Upstream, Message::sync(snapshot.clone()));
    assert_eq!(drain(&mut downstream), vec![Message::sync(snapshot)]);
    assert!(drain(&mut upstream).is_empty());
}

/// A root, a middle node and a leaf wired together by in-memory queues.
struct Line {
    root: Node,
    middle: Node,
    leaf: Node,
    middle_id: ConnectionId,
    leaf_id: ConnectionId,
    root_to_middle: Frames,
    middle_to_root: Frames,
    middle_to_leaf: Frames,
    leaf_to_middle: Frames,
}

impl Line {
    /// The leaf joins the middle node before the middle node joins the root.
    fn leaf_first() -> Self {
        let (mut root, _) = root();
        let mut middle = Node::new(Chain::empty(None));
        let mut leaf = Node::new(Chain::empty(None));

        let (sender, middle_to_leaf) = FrameSender::channel();
        let leaf_id = ConnectionId::next();
        middle.connected(leaf_id, sender);
        let (sender, leaf_to_middle) = FrameSender::channel();
        leaf.upstream_connected(sender);

        let (sender, root_to_middle) = FrameSender::channel();
        let middle_id = ConnectionId::next();
        root.connected(middle_id, sender);
        let (sender, middle_to_root) = FrameSender::channel();
        middle.upstream_connected(sender);

        Self {
            root,
            middle,
            leaf,
            middle_id,
            leaf_id,
            root_to_middle,
            middle_to_root,
            middle_to_leaf,
            leaf_to_middle,
        }
    }

    /// Deliver frames until every queue is empty.
    fn deliver(&mut self) {
        loop {
            let mut delivered = false;
            while let Ok(frame) = self.middle_to_leaf.try_recv() {
                self.leaf.handle_frame(Origin::Upstream, &frame);
                delivered = true;
            }
            while let Ok(frame) = self.leaf_to_middle.try_recv() {
                self.middle
                    .handle_frame(Origin::Downstream(self.leaf_id), &frame);
                delivered = true;
            }
            while let Ok(frame) = self.root_to_middle.try_recv() {
                self.middle.handle_frame(Origin::Upstream, &frame);
                delivered = true;
            }
            while let Ok(frame) = self.middle_to_root.try_recv() {
                self.root
                    .handle_frame(Origin::Downstream(self.middle_id), &frame);
                delivered = true;
            }
            if !delivered {
                break;
            }
        }
    }
}

#[test]
fn late_upstream_sync_keeps_the_whole_line_in_step() {
    let mut line = Line::leaf_first();
    line.deliver();

    line.root.submit_entry("a".to_string(), json!(1)).unwrap();
    line.deliver();
    line.root.submit_entry("b".to_string(), json!(2)).unwrap();
    line.deliver();

    let expected = line.root.chain().snapshot();
    assert_eq!(expected.blocks.len(), 3);
    assert_eq!(line.middle.chain().snapshot(), expected);
    assert_eq!(line.leaf.chain().snapshot(), expected);
}

#[test]
fn submit_entry_broadcasts_everywhere() {
    let (mut node, authority) = root();
    let (sender, mut upstream) = FrameSender::channel();
    node.upstream_connected(sender);
    let (_, mut first) = connect_downstream(&mut node);
    let (_, mut second) = connect_downstream(&mut node);
    drain(&mut first);
    drain(&mut second);

    let entry = node
        .submit_entry("temperature".to_string(), json!({"celsius": 21}))
        .unwrap();
    assert_eq!(
        entry.block.data,
        json!({"name": "temperature", "payload": {"celsius": 21}})
    );
    assert!(entry.block.verify(authority.id()));
    assert!(entry.block.verify_owner(&entry.owner_id));
    assert_eq!(
        Identity::from_hex(&entry.owner_secret).unwrap().id(),
        &entry.owner_id
    );

    for frames in &mut [&mut first, &mut second, &mut upstream] {
        let messages = drain(frames);
        assert_eq!(messages, vec![Message::add(entry.block.clone())]);
    }
}

#[test]
fn follower_cannot_submit() {
    let (root, _) = root();
    let (mut follower, _) = follower(&root);

    assert!(matches!(
        follower.submit_entry("a".to_string(), json!(1)),
        Err(Error::Chain(chain::Error::NotAuthority))
    ));
    assert_eq!(follower.chain().len(), 1);
}

#[test]
fn valid_add_is_relayed_except_to_the_sender() {
    let (mut root, _) = root();
    let (mut follower, mut upstream) = follower(&root);
    let (sender_id, mut sender) = connect_downstream(&mut follower);
    let (_, mut other) = connect_downstream(&mut follower);
    drain(&mut sender);
    drain(&mut other);

    let block = root.submit_entry("a".to_string(), json!(1)).unwrap().block;
    let message = Message::add(block.clone()).with_id("m-1");

    follower.handle_frame(Origin::Downstream(sender_id), &frame(&message));
    assert_eq!(follower.chain().tip(), Some(&block));

    assert!(drain(&mut sender).is_empty());
    assert_eq!(drain(&mut other), vec![message.clone()]);
    assert_eq!(drain(&mut upstream), vec![message]);
}

#[test]
fn add_from_upstream_is_not_sent_back() {
    let (mut root, _) = root();
    let (mut follower, mut upstream) = follower(&root);
    let (_, mut downstream) = connect_downstream(&mut follower);
    drain(&mut downstream);

    let block = root.submit_entry("a".to_string(), json!(1)).unwrap().block;
    follower.handle_frame(Origin::Upstream, &frame(&Message::add(block.clone())));

    assert_eq!(follower.chain().len(), 2);
    assert_eq!(drain(&mut downstream), vec![Message::add(block)]);
    assert!(drain(&mut upstream).is_empty());
}

#[test]
fn badly_signed_add_is_rejected_to_the_sender_only() {
    let (root, _) = root();
    let (mut follower, mut upstream) = follower(&root);
    let (sender_id, mut sender) = connect_downstream(&mut follower);
    let (_, mut other) = connect_downstream(&mut follower);
    drain(&mut sender);
    drain(&mut other);

    let tip = root.chain().tip().unwrap();
    let mut forged = Block::new(tip.index.next(), tip.hash, json!("forged"));
    forged.sign(Some(&Identity::generate()));

    follower.handle_frame(Origin::Downstream(sender_id), &frame(&Message::add(forged.clone())));

    assert_eq!(follower.chain().len(), 1);
    assert_eq!(drain(&mut sender), vec![Message::reject(forged)]);
    assert!(drain(&mut other).is_empty());
    assert!(drain(&mut upstream).is_empty());
}

#[test]
fn out_of_order_add_is_rejected() {
    let (mut root, _) = root();
    let (mut follower, mut upstream) = follower(&root);

    root.submit_entry("a".to_string(), json!(1)).unwrap();
    let second = root.submit_entry("b".to_string(), json!(2)).unwrap().block;

    follower.handle_frame(Origin::Upstream, &frame(&Message::add(second.clone())));
    assert_eq!(follower.chain().len(), 1);
    assert_eq!(drain(&mut upstream), vec![Message::reject(second)]);
}

#[test]
fn reject_rolls_back_the_block() {
    let (mut node, _) = root();
    let (id, _frames) = connect_downstream(&mut node);
    let a = node.submit_entry("a".to_string(), json!(1)).unwrap().block;
    node.submit_entry("b".to_string(), json!(2)).unwrap();
    assert_eq!(node.chain().len(), 3);

    node.handle_frame(Origin::Downstream(id), &frame(&Message::reject(a)));
    assert_eq!(node.chain().len(), 1);
}

#[test]
fn reject_of_unknown_block_changes_nothing() {
    let (mut node, _) = root();
    let (id, _frames) = connect_downstream(&mut node);
    node.submit_entry("a".to_string(), json!(1)).unwrap();
    let before = node.chain().snapshot();

    let unknown = Block::new(Default::default(), BlockHash::default(), json!("unknown"));
    node.handle_frame(Origin::Downstream(id), &frame(&Message::reject(unknown)));
    assert_eq!(node.chain().snapshot(), before);
}

#[test]
fn garbage_is_dropped() {
    let (mut node, _) = root();
    let (id, mut frames) = connect_downstream(&mut node);
    drain(&mut frames);
    let before = node.chain().snapshot();

    node.handle_frame(Origin::Downstream(id), b"garbage");
    node.handle_frame(Origin::Downstream(id), br#"{"type":"update","data":{}}"#);

    assert_eq!(node.chain().snapshot(), before);
    assert!(drain(&mut frames).is_empty());
}

#[test]
fn disconnected_peers_are_forgotten() {
    let (mut node, _) = root();
    let (first, _first_frames) = connect_downstream(&mut node);
    let (_, mut second) = connect_downstream(&mut node);
    assert_eq!(node.downstream_count(), 2);

    node.disconnected(first);
    node.disconnected(first);
    assert_eq!(node.downstream_count(), 1);

    drain(&mut second);
    node.submit_entry("a".to_string(), json!(1)).unwrap();
    assert_eq!(drain(&mut second).len(), 1);
}

#[test]
fn closed_peer_does_not_break_broadcast() {
    let (mut node, _) = root();
    let (_, frames) = connect_downstream(&mut node);
    drop(frames);

    node.submit_entry("a".to_string(), json!(1)).unwrap();
    assert_eq!(node.chain().len(), 2);
}

#[test]
fn upstream_lost() {
    let (root, _) = root();
    let (mut follower, _) = follower(&root);
    assert!(follower.has_upstream());
    follower.upstream_lost();
    assert!(!follower.has_upstream());
}

#[test]
fn ownership_and_validation() {
    let (mut node, _) = root();
    let entry = node.submit_entry("a".to_string(), json!(1)).unwrap();

    assert_eq!(
        node.verify_ownership(&entry.block.hash, &entry.owner_id),
        Some(true)
    );
    assert_eq!(
        node.verify_ownership(&entry.block.hash, Identity::generate().id()),
        Some(false)
    );
    assert_eq!(
        node.verify_ownership(&BlockHash::default(), &entry.owner_id),
        None
    );
    assert!(node.validate());
}

#[test]
fn connection_ids_are_unique() {
    let ids: Vec<_> = (0..100).map(|_| ConnectionId::next()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[tokio::test]
async fn handle_answers_requests() {
    let (node, _) = root();
    let handle = node.spawn();

    let (sender, mut frames) = FrameSender::channel();
    let _id = handle.connected(sender);

    let entry = handle
        .submit_entry("a".to_string(), json!("x"))
        .await
        .unwrap();
    let chain = handle.chain().await.unwrap();
    assert_eq!(chain.blocks.last(), Some(&entry.block));
    assert_eq!(
        handle
            .verify_ownership(entry.block.hash, entry.owner_id.clone())
            .await
            .unwrap(),
        Some(true)
    );
    assert!(handle.validate().await.unwrap());

    // sync on connect, then the new block
    assert_eq!(drain(&mut frames).len(), 2);
}
