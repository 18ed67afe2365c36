//! Pin set durability and reachability against on-disk repositories

use super::test_utils::about_and_readme;
use pinseed::config::StorageConfig;
use pinseed::dag::{self, DirectoryBuilder};
use pinseed::pin::{FilePinStore, PinManager, PinStore};
use pinseed::store::{ContentStore, MemoryContentStore};
use pinseed::{seed_assets, ContentId, Node, PinMode};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_failed_flush_keeps_previous_file() {
    let temp_dir = TempDir::new().unwrap();
    let pins_path = temp_dir.path().join("pins.bin");
    let durable: Arc<dyn PinStore> = Arc::new(FilePinStore::new(&pins_path));
    let manager = PinManager::load(durable).unwrap();

    let first = ContentId::of(b"first");
    manager.pin(first, PinMode::Recursive);
    manager.flush().unwrap();

    // A non-empty directory where the temp file goes makes the write fail
    let blocker = temp_dir.path().join("pins.bin.tmp");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("occupied"), b"x").unwrap();

    manager.pin(ContentId::of(b"second"), PinMode::Direct);
    assert!(manager.flush().is_err());
    assert!(manager.is_dirty());

    let reloaded = FilePinStore::new(&pins_path).load().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(&first), Some(&PinMode::Recursive));
}

#[test]
fn test_seeded_tree_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageConfig::default();

    let root = {
        let node = Node::open(temp_dir.path(), &storage).unwrap();
        seed_assets(&node, &about_and_readme()).unwrap()
    };

    let node = Node::open(temp_dir.path(), &storage).unwrap();
    assert_eq!(node.pins().mode(&root), Some(PinMode::Recursive));

    let dir = dag::load_directory(node.store(), &root).unwrap();
    assert_eq!(dir.get("about"), Some(&ContentId::of(b"A")));

    let live = node.pins().live_set(node.store()).unwrap();
    let expected = [root, ContentId::of(b"A"), ContentId::of(b"R")];
    assert_eq!(live.len(), expected.len());
    for id in &expected {
        assert!(live.contains(id));
    }
}

#[test]
fn test_live_set_direct_versus_recursive() {
    let store = MemoryContentStore::new();
    let leaf = store.add(b"leaf").unwrap();
    let mut inner = DirectoryBuilder::new();
    inner.add_child("leaf", leaf).unwrap();
    let inner_id = dag::commit(&store, &inner.build()).unwrap();
    let mut outer = DirectoryBuilder::new();
    outer.add_child("inner", inner_id).unwrap();
    let outer_id = dag::commit(&store, &outer.build()).unwrap();

    let node = Node::new(
        Arc::new(store),
        Arc::new(PinManager::load(Arc::new(pinseed::pin::MemoryPinStore::new())).unwrap()),
    );

    node.pins().pin(outer_id, PinMode::Direct);
    let live = node.pins().live_set(node.store()).unwrap();
    assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![outer_id]);

    node.pins().pin(outer_id, PinMode::Recursive);
    let live = node.pins().live_set(node.store()).unwrap();
    assert!(live.contains(&outer_id));
    assert!(live.contains(&inner_id));
    assert!(live.contains(&leaf));
}

#[test]
fn test_custom_storage_layout() {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageConfig {
        store_dir: "data/objects".into(),
        pins_file: "state/pins.bin".into(),
    };

    {
        let node = Node::open(temp_dir.path(), &storage).unwrap();
        seed_assets(&node, &about_and_readme()).unwrap();
    }

    assert!(temp_dir.path().join("data").join("objects").is_dir());
    assert!(temp_dir.path().join("state").join("pins.bin").is_file());
    assert!(!temp_dir.path().join("state").join("pins.bin.tmp").exists());
}
