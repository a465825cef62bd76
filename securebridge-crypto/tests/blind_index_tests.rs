//! Blind index determinism and key separation.

mod support;

use proptest::prelude::*;
use securebridge_crypto::BlindIndexer;
use support::{keys, other_keys};

#[test]
fn index_is_deterministic() {
    let indexer = BlindIndexer::new(keys());
    assert_eq!(indexer.compute("123456789"), indexer.compute("123456789"));
}

#[test]
fn separate_indexers_over_same_keys_agree() {
    let a = BlindIndexer::new(keys());
    let b = BlindIndexer::new(keys());
    assert_eq!(a.compute("ID-12345-6789"), b.compute("ID-12345-6789"));
}

#[test]
fn index_is_lowercase_hex_sha256() {
    let index = BlindIndexer::new(keys()).compute("123456789");
    assert_eq!(index.len(), 64);
    assert!(index.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

#[test]
fn different_inputs_give_different_indexes() {
    let indexer = BlindIndexer::new(keys());
    assert_ne!(indexer.compute("123456789"), indexer.compute("000000000"));
    assert_ne!(indexer.compute("123456789"), indexer.compute("123456789 "));
    assert_ne!(indexer.compute(""), indexer.compute(" "));
}

#[test]
fn index_depends_on_secret() {
    let ours = BlindIndexer::new(keys()).compute("123456789");
    let theirs = BlindIndexer::new(other_keys()).compute("123456789");
    assert_ne!(ours, theirs);
}

#[test]
fn index_is_not_a_plain_hash() {
    use sha2::{Digest, Sha256};

    let plain = hex::encode(Sha256::digest(b"123456789"));
    assert_ne!(BlindIndexer::new(keys()).compute("123456789"), plain);
}

proptest! {
    #[test]
    fn repeated_calls_agree(value in ".{0,128}") {
        let indexer = BlindIndexer::new(keys());
        prop_assert_eq!(indexer.compute(&value), indexer.compute(&value));
    }

    #[test]
    fn distinct_values_do_not_collide(a in "[0-9]{9}", b in "[0-9]{9}") {
        prop_assume!(a != b);
        let indexer = BlindIndexer::new(keys());
        prop_assert_ne!(indexer.compute(&a), indexer.compute(&b));
    }
}
