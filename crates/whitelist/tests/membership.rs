//! End-to-end membership checks through the public API

use council_whitelist::{
    hash_identity, hash_pair, verify, MemberSet, MembershipProofBundle, MembershipProver,
    MerkleTree, WhitelistConfig, WhitelistError,
};

fn member_set(names: &[&str]) -> MemberSet {
    MemberSet::new(names.iter().map(ToString::to_string).collect()).expect("valid roster")
}

#[test]
fn test_alice_and_bob_roster() {
    let prover = MembershipProver::new(member_set(&["alice.testnet", "bob.testnet"]));

    assert!(prover.is_member("alice.testnet"));
    assert!(!prover.is_member("carol.testnet"));
}

#[test]
fn test_single_member_root_duplicates_leaf() {
    let prover = MembershipProver::new(member_set(&["alice.testnet"]));
    let leaf = hash_identity("alice.testnet");

    assert_eq!(prover.root(), hash_pair(&leaf, &leaf));
    assert!(prover.is_member("alice.testnet"));
}

#[test]
fn test_empty_roster_fails_fast() {
    assert!(matches!(
        MemberSet::new(vec![]),
        Err(WhitelistError::EmptyMemberSet)
    ));
    assert!(matches!(
        MerkleTree::from_leaves(vec![]),
        Err(WhitelistError::EmptyMemberSet)
    ));

    let config = WhitelistConfig::from_json_str(r#"{ "members": [] }"#).expect("parses");
    let err = MembershipProver::from_config(config).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_proof_for_every_member_of_odd_roster() {
    let names = ["m1.near", "m2.near", "m3.near", "m4.near", "m5.near", "m6.near", "m7.near"];
    let members = member_set(&names);
    let tree = MerkleTree::build(&members);
    let root = tree.root();

    for name in names {
        let leaf = hash_identity(name);
        let proof = tree.proof(&leaf).expect("member has a proof");
        assert!(verify(&proof, &leaf, &root), "{name} should verify");
    }
}

#[test]
fn test_proof_does_not_transfer_between_roots() {
    let tree_a = MerkleTree::build(&member_set(&["alice.testnet", "bob.testnet", "carol.testnet"]));
    let tree_b = MerkleTree::build(&member_set(&["alice.testnet", "bob.testnet", "dave.testnet"]));
    assert_ne!(tree_a.root(), tree_b.root());

    let leaf = hash_identity("alice.testnet");
    let proof = tree_a.proof(&leaf).expect("alice is in tree A");

    assert!(verify(&proof, &leaf, &tree_a.root()));
    assert!(!verify(&proof, &leaf, &tree_b.root()));
}

#[test]
fn test_proof_does_not_transfer_between_leaves() {
    let tree = MerkleTree::build(&member_set(&["alice.testnet", "bob.testnet"]));
    let alice = hash_identity("alice.testnet");
    let carol = hash_identity("carol.testnet");

    let proof = tree.proof(&alice).expect("alice is a member");
    assert!(!verify(&proof, &carol, &tree.root()));
}

#[test]
fn test_order_sensitivity() {
    let forward = MerkleTree::build(&member_set(&["alice.testnet", "bob.testnet", "carol.testnet"]));
    let shuffled = MerkleTree::build(&member_set(&["bob.testnet", "alice.testnet", "carol.testnet"]));
    assert_ne!(forward.root(), shuffled.root());

    let solo_a = MerkleTree::build(&member_set(&["alice.testnet"]));
    let solo_b = MerkleTree::build(&member_set(&["alice.testnet"]));
    assert_eq!(solo_a.root(), solo_b.root());
}

#[test]
fn test_bundle_survives_json_transport() {
    let prover = MembershipProver::new(member_set(&["alice.testnet", "bob.testnet", "carol.testnet"]));
    let bundle = prover.prove("bob.testnet").expect("bob is a member");

    let json = serde_json::to_string_pretty(&bundle).expect("serialize");
    let received: MembershipProofBundle = serde_json::from_str(&json).expect("deserialize");

    assert!(received.verify());
    assert!(prover.verify_bundle(&received));
}

#[test]
fn test_pinned_root_from_file() {
    let reference = MembershipProver::new(member_set(&["alice.testnet", "bob.testnet"]));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("council.json");
    let config = WhitelistConfig {
        members: vec!["alice.testnet".to_string(), "bob.testnet".to_string()],
        root: Some(reference.root_hex()),
    };
    std::fs::write(&path, serde_json::to_string(&config).expect("serialize")).expect("write");

    let loaded = WhitelistConfig::load(&path).expect("load");
    let prover = MembershipProver::from_config(loaded).expect("root matches");
    assert!(prover.is_member("bob.testnet"));
}

#[test]
fn test_sample_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/council.example.json");
    let config = WhitelistConfig::load(path).expect("sample config");
    let prover = MembershipProver::from_config(config).expect("sample roster is valid");

    assert_eq!(prover.member_count(), 4);
    assert!(prover.is_member("alice.testnet"));
    assert!(!prover.is_member("mallory.testnet"));
}
