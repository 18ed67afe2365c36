//! Root keys depend only on content, never on insertion order

use pinseed::dag::{self, codec, DirectoryBuilder};
use pinseed::store::{ContentStore, MemoryContentStore};
use pinseed::{seed_assets, Asset, ContentId, Node};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Distinct entry names mapped to arbitrary bodies
fn named_bodies() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map("[a-zA-Z0-9][a-zA-Z0-9._-]{0,11}", any::<Vec<u8>>(), 0..12)
}

/// Test that ContentId computation is deterministic
#[test]
fn test_content_id_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<Vec<u8>>(), any::<Vec<u8>>()), |(content1, content2)| {
            let store = MemoryContentStore::new();
            let id1 = store.add(&content1).unwrap();
            let id2 = store.add(&content2).unwrap();

            prop_assert_eq!(id1, ContentId::of(&content1));
            if content1 == content2 {
                prop_assert_eq!(id1, id2);
                prop_assert_eq!(store.len().unwrap(), 1);
            } else {
                prop_assert_ne!(id1, id2);
            }
            Ok(())
        })
        .unwrap();
}

/// Test that a directory's root key ignores insertion order
#[test]
fn test_directory_order_independence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let strategy = named_bodies().prop_flat_map(|entries| {
        let names: Vec<String> = entries.keys().cloned().collect();
        (Just(entries), Just(names).prop_shuffle())
    });

    runner
        .run(&strategy, |(entries, shuffled)| {
            let store = MemoryContentStore::new();

            let mut sorted = DirectoryBuilder::new();
            for (name, body) in &entries {
                sorted.add_child(name.clone(), ContentId::of(body)).unwrap();
            }
            let mut permuted = DirectoryBuilder::new();
            for name in &shuffled {
                permuted
                    .add_child(name.clone(), ContentId::of(&entries[name]))
                    .unwrap();
            }

            let first = dag::commit(&store, &sorted.build()).unwrap();
            let second = dag::commit(&store, &permuted.build()).unwrap();
            prop_assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}

/// Test that decoding a committed directory yields its entries in canonical order
#[test]
fn test_decode_is_canonical_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&named_bodies(), |entries| {
            let store = MemoryContentStore::new();
            let mut builder = DirectoryBuilder::new();
            for (name, body) in entries.iter().rev() {
                builder.add_child(name.clone(), ContentId::of(body)).unwrap();
            }
            let node = builder.build();
            let bytes = codec::encode(&node).unwrap();
            prop_assert!(codec::is_directory(&bytes));

            let root = dag::commit(&store, &node).unwrap();
            let decoded = dag::load_directory(&store, &root).unwrap();
            let names: Vec<&str> = decoded.entries().iter().map(|e| e.name.as_str()).collect();
            let expected: Vec<&str> = entries.keys().map(String::as_str).collect();
            prop_assert_eq!(names, expected);
            Ok(())
        })
        .unwrap();
}

/// Test that seeding the same asset set in any order yields the same pinned root
#[test]
fn test_seed_order_independence_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(32));

    let strategy = named_bodies().prop_flat_map(|entries| {
        let assets: Vec<(String, Vec<u8>)> = entries.into_iter().collect();
        (Just(assets.clone()), Just(assets).prop_shuffle())
    });

    runner
        .run(&strategy, |(ordered, shuffled)| {
            let to_assets = |list: &[(String, Vec<u8>)]| -> Vec<Asset> {
                list.iter()
                    .map(|(name, body)| Asset::new(format!("bundle/{}", name), body.clone()))
                    .collect()
            };

            let node = Node::in_memory().unwrap();
            let first = seed_assets(&node, &to_assets(&ordered)).unwrap();
            let second = seed_assets(&node, &to_assets(&shuffled)).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(node.pins().len(), 1);
            Ok(())
        })
        .unwrap();
}
