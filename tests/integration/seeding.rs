//! End-to-end seeding behavior: idempotence, ordering, aborts and retries

use super::test_utils::{about_and_readme, numbered_assets, FlakyStore};
use pinseed::dag;
use pinseed::error::{ErrorKind, SeedPhase};
use pinseed::pin::{MemoryPinStore, PinSet, PinStore};
use pinseed::store::{ContentStore, MemoryContentStore};
use pinseed::seed::SeedOptions;
use pinseed::{seed_assets, Asset, AssetSeeder, ContentId, Node, PinMode};
use std::sync::Arc;
use std::time::Duration;

fn node_with(store: Arc<dyn ContentStore>, pins: Arc<MemoryPinStore>) -> Node {
    let durable: Arc<dyn PinStore> = pins;
    Node::with_pin_store(store, durable).unwrap()
}

#[test]
fn test_seeding_twice_is_idempotent() {
    let node = Node::in_memory().unwrap();
    let assets = about_and_readme();

    let first = seed_assets(&node, &assets).unwrap();
    let objects_after_first = node.store().len().unwrap();
    let second = seed_assets(&node, &assets).unwrap();

    assert_eq!(first, second);
    // Two blobs plus one directory, nothing duplicated
    assert_eq!(objects_after_first, 3);
    assert_eq!(node.store().len().unwrap(), 3);
    assert_eq!(node.pins().list(), vec![(first, PinMode::Recursive)]);
}

#[test]
fn test_root_independent_of_asset_order() {
    let assets = numbered_assets(5);
    let mut reversed = assets.clone();
    reversed.reverse();

    let forward = seed_assets(&Node::in_memory().unwrap(), &assets).unwrap();
    let backward = seed_assets(&Node::in_memory().unwrap(), &reversed).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn test_committed_directory_links_every_asset() {
    let node = Node::in_memory().unwrap();
    let assets = numbered_assets(4);
    let root = seed_assets(&node, &assets).unwrap();

    let dir = dag::load_directory(node.store(), &root).unwrap();
    assert_eq!(dir.len(), 4);
    for asset in &assets {
        assert_eq!(dir.get(&asset.name()), Some(&ContentId::of(asset.bytes())));
    }
}

#[test]
fn test_duplicate_names_reject_whole_seed() {
    let node = Node::in_memory().unwrap();
    let assets = vec![
        Asset::new("a/about", b"first".to_vec()),
        Asset::new("b/about", b"second".to_vec()),
    ];

    let err = seed_assets(&node, &assets).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    assert!(!err.is_retryable());
    assert!(node.pins().is_empty());
}

#[test]
fn test_store_failure_on_third_of_five_aborts() {
    let flaky = Arc::new(FlakyStore::new());
    flaky.fail_add(3);
    let node = node_with(flaky.clone(), Arc::new(MemoryPinStore::new()));

    let err = seed_assets(&node, &numbered_assets(5)).unwrap_err();
    assert_eq!(err.phase(), SeedPhase::Add);
    assert_eq!(err.asset(), Some("asset-3"));
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(err.is_retryable());

    // No further adds, no directory, no pin; the first two blobs remain
    assert_eq!(flaky.add_calls(), 3);
    assert_eq!(flaky.len().unwrap(), 2);
    assert!(node.pins().is_empty());
}

#[test]
fn test_retry_after_store_failure_matches_clean_run() {
    let flaky = Arc::new(FlakyStore::new());
    flaky.fail_add(3);
    let node = node_with(flaky.clone(), Arc::new(MemoryPinStore::new()));
    let assets = numbered_assets(5);

    assert!(seed_assets(&node, &assets).is_err());
    let retried = seed_assets(&node, &assets).unwrap();

    let clean = Node::in_memory().unwrap();
    let expected = seed_assets(&clean, &assets).unwrap();
    assert_eq!(retried, expected);
    assert_eq!(flaky.len().unwrap(), clean.store().len().unwrap());
}

#[test]
fn test_flush_failure_then_retry_matches_clean_run() {
    let durable = Arc::new(MemoryPinStore::new());
    durable.fail_next_writes(1);
    let node = node_with(Arc::new(MemoryContentStore::new()), durable.clone());
    let assets = about_and_readme();

    let err = seed_assets(&node, &assets).unwrap_err();
    assert_eq!(err.phase(), SeedPhase::Persist);
    assert_eq!(err.kind(), ErrorKind::PersistenceError);
    assert!(err.is_retryable());
    // Durable state is still the pre-seed state
    assert!(durable.snapshot().is_empty());

    let root = seed_assets(&node, &assets).unwrap();

    let clean_durable = Arc::new(MemoryPinStore::new());
    let clean = node_with(Arc::new(MemoryContentStore::new()), clean_durable.clone());
    let clean_root = seed_assets(&clean, &assets).unwrap();

    assert_eq!(root, clean_root);
    assert_eq!(durable.snapshot(), clean_durable.snapshot());
    let expected: PinSet = [(root, PinMode::Recursive)].into_iter().collect();
    assert_eq!(durable.snapshot(), expected);
    assert_eq!(node.store().len().unwrap(), clean.store().len().unwrap());
}

#[test]
fn test_seed_keeps_existing_pins() {
    let existing = ContentId::of(b"pinned earlier");
    let durable = Arc::new(MemoryPinStore::with_pins(
        [(existing, PinMode::Direct)].into_iter().collect(),
    ));
    let node = node_with(Arc::new(MemoryContentStore::new()), durable.clone());

    let root = seed_assets(&node, &about_and_readme()).unwrap();
    let snapshot = durable.snapshot();
    assert_eq!(snapshot.get(&existing), Some(&PinMode::Direct));
    assert_eq!(snapshot.get(&root), Some(&PinMode::Recursive));
}

#[tokio::test]
async fn test_concurrent_seed_aborts_without_pin() {
    let flaky = Arc::new(FlakyStore::new());
    flaky.fail_add(3);
    let node = node_with(flaky.clone(), Arc::new(MemoryPinStore::new()));

    let err = AssetSeeder::new(&node)
        .seed_concurrent(&numbered_assets(5))
        .await
        .unwrap_err();
    assert_eq!(err.phase(), SeedPhase::Add);
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(node.pins().is_empty());
}

#[tokio::test]
async fn test_concurrent_seed_flush_timeout_then_retry() {
    let durable = Arc::new(MemoryPinStore::new());
    durable.delay_writes(Duration::from_millis(300));
    let node = node_with(Arc::new(MemoryContentStore::new()), durable.clone());
    let seeder = AssetSeeder::new(&node).with_options(SeedOptions {
        flush_timeout: Duration::from_millis(10),
    });

    let err = seeder.seed_concurrent(&about_and_readme()).await.unwrap_err();
    assert_eq!(err.phase(), SeedPhase::Persist);
    assert_eq!(err.kind(), ErrorKind::PersistenceError);
    assert!(err.is_retryable());

    // Whatever was persisted is complete: empty or exactly the new pin
    let snapshot = durable.snapshot();
    assert!(snapshot.is_empty() || snapshot.len() == 1);

    // Rerunning with a generous budget converges on the clean result
    let seeder = AssetSeeder::new(&node).with_options(SeedOptions {
        flush_timeout: Duration::from_secs(5),
    });
    let root = seeder.seed_concurrent(&about_and_readme()).await.unwrap();
    let expected: PinSet = [(root, PinMode::Recursive)].into_iter().collect();
    assert_eq!(durable.snapshot(), expected);
}
