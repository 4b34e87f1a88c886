use pinxit::{Identity, PeerId, Signature, Signer};
use serde_json::json;
use std::time::{Duration, SystemTime};
use treechain_client_api::{Block, BlockHash, BlockNumber, ChainSnapshot};

fn genesis() -> Block {
    Block::with_timestamp(
        BlockNumber::genesis(),
        BlockHash::default(),
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000),
        json!("Genesis Block"),
    )
}

/// Claims to be `claimed` but signs with another key.
struct ForgingSigner {
    claimed: PeerId,
    actual: Identity,
}

impl Signer for ForgingSigner {
    fn id(&self) -> &PeerId {
        &self.claimed
    }

    fn sign_bytes(&self, data: &[u8]) -> Signature {
        self.actual.sign_bytes(data)
    }
}

#[test]
fn hash_depends_on_every_hashed_field() {
    let block = genesis();
    assert!(block.has_valid_hash());

    let mut other = block.clone();
    other.data = json!("Genesis Block!");
    assert_ne!(other.compute_hash(), block.hash);

    let mut other = block.clone();
    other.timestamp += Duration::from_nanos(1);
    assert_ne!(other.compute_hash(), block.hash);

    let mut other = block.clone();
    other.previous_hash = block.hash;
    assert_ne!(other.compute_hash(), block.hash);

    // the index is not part of the hash
    let mut other = block.clone();
    other.index = BlockNumber::from(7);
    assert_eq!(other.compute_hash(), block.hash);
}

#[test]
fn hash_ignores_object_key_order() {
    let time = SystemTime::now();
    let a: serde_json::Value = serde_json::from_str(r#"{"name":"a","payload":1}"#).unwrap();
    let b: serde_json::Value = serde_json::from_str(r#"{"payload":1,"name":"a"}"#).unwrap();

    let a = Block::with_timestamp(BlockNumber::from(1), BlockHash::default(), time, a);
    let b = Block::with_timestamp(BlockNumber::from(1), BlockHash::default(), time, b);
    assert_eq!(a.hash, b.hash);
}

#[test]
fn timestamp_shift_by_wrap_around_breaks_hash_and_signature() {
    let authority = Identity::generate();
    let mut block = genesis();
    block.sign(Some(&authority));

    // move the timestamp by 2^64 nanoseconds and send it over the wire
    let mut shifted = block.clone();
    shifted.timestamp += Duration::new(18_446_744_073, 709_551_616);
    let shifted: Block = serde_json::from_value(serde_json::to_value(&shifted).unwrap()).unwrap();

    assert_ne!(shifted.timestamp, block.timestamp);
    assert_ne!(shifted.compute_hash(), block.hash);
    assert!(!shifted.has_valid_hash());
    assert!(!shifted.verify(authority.id()));
}

#[test]
fn stored_hash_is_not_trusted() {
    let mut block = genesis();
    block.hash = BlockHash::from([1; 64]);
    assert!(!block.has_valid_hash());
}

#[test]
fn signature_gating() {
    let authority = Identity::generate();
    let other = Identity::generate();

    let mut block = genesis();
    assert!(!block.verify(authority.id()));

    block.sign(Some(&authority));
    assert!(block.verify(authority.id()));
    assert!(!block.verify(other.id()));

    // tampering with the payload breaks the signature
    let mut tampered = block.clone();
    tampered.data = json!("Forged");
    assert!(!tampered.verify(authority.id()));

    block.sign(None);
    assert!(block.authority_signature.is_none());
    assert!(!block.verify(authority.id()));
}

#[test]
fn forged_signer_does_not_verify() {
    let authority = Identity::generate();
    let forger = ForgingSigner {
        claimed: authority.id().clone(),
        actual: Identity::generate(),
    };

    let mut block = genesis();
    block.sign(Some(&forger));
    assert!(block.authority_signature.is_some());
    assert!(!block.verify(authority.id()));
}

#[test]
fn owner_claim_is_independent_of_authority() {
    let authority = Identity::generate();
    let owner = Identity::generate();

    let mut block = genesis();
    block.mark_owner(Some(&owner));
    assert!(block.verify_owner(owner.id()));
    assert!(!block.verify_owner(authority.id()));
    assert!(!block.verify(owner.id()));

    block.sign(Some(&authority));
    assert!(block.verify(authority.id()));
    assert!(block.verify_owner(owner.id()));

    block.mark_owner(None);
    assert!(block.owner_signature.is_none());
    assert!(!block.verify_owner(owner.id()));
}

#[test]
fn json_round_trip_keeps_every_field() {
    let authority = Identity::generate();
    let owner = Identity::generate();

    let mut block = Block::new(
        BlockNumber::from(3),
        genesis().hash,
        json!({"name": "entry", "payload": [1, 2, {"x": null}]}),
    );
    block.sign(Some(&authority));
    block.mark_owner(Some(&owner));

    let encoded = serde_json::to_value(&block).unwrap();
    assert_eq!(encoded["index"], json!(3));
    assert_eq!(encoded["previousHash"], json!(genesis().hash.hex()));
    assert_eq!(encoded["hash"], json!(block.hash.hex()));
    assert!(encoded["authoritySignature"].is_string());
    assert!(encoded["ownerSignature"].is_string());

    let decoded: Block = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, block);
    assert_eq!(decoded.compute_hash(), block.hash);
    assert!(decoded.verify(authority.id()));
    assert!(decoded.verify_owner(owner.id()));
}

#[test]
fn unsigned_block_serializes_null_signatures() {
    let encoded = serde_json::to_value(&genesis()).unwrap();
    assert!(encoded["authoritySignature"].is_null());
    assert!(encoded["ownerSignature"].is_null());
}

#[test]
fn block_hash_hex() {
    let hash = genesis().hash;
    assert_eq!(hash.hex().len(), 128);
    assert_eq!(hash.hex().parse::<BlockHash>().unwrap(), hash);
    assert_eq!(BlockHash::default().hex(), "0".repeat(128));
    assert!("abc".parse::<BlockHash>().is_err());
    assert!(serde_json::from_str::<BlockHash>("\"zz\"").is_err());
}

#[test]
fn snapshot_json_shape() {
    let authority = Identity::generate();
    let mut block = genesis();
    block.sign(Some(&authority));

    let snapshot = ChainSnapshot {
        authority_public_key: Some(authority.id().clone()),
        blocks: vec![block.clone()],
    };
    let encoded = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(encoded["authorityPublicKey"], json!(authority.id().hex()));
    assert_eq!(encoded["blocks"][0]["hash"], json!(block.hash.hex()));

    let decoded: ChainSnapshot = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.blocks.last(), Some(&block));

    let empty: ChainSnapshot =
        serde_json::from_str(r#"{"authorityPublicKey":null,"blocks":[]}"#).unwrap();
    assert!(empty.authority_public_key.is_none());
    assert!(empty.blocks.is_empty());
}
