use pretty_assertions::assert_eq;
use securebridge_storage::{MemoryRecordStore, RecordStore, StorageRecord};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

// ── Basic behavior ──

#[test]
fn empty_store() {
    let store = MemoryRecordStore::new();
    assert!(store.is_empty().unwrap());
    assert_eq!(store.len().unwrap(), 0);
    assert!(store.scan_equal("abc").unwrap().is_empty());
}

#[test]
fn ids_start_at_one_and_increase() {
    let store = MemoryRecordStore::new();
    assert_eq!(store.append("blob-a", "idx-a").unwrap(), 1);
    assert_eq!(store.append("blob-b", "idx-b").unwrap(), 2);
    assert_eq!(store.append("blob-c", "idx-a").unwrap(), 3);
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn scan_returns_only_equal_indexes() {
    let store = MemoryRecordStore::new();
    store.append("blob-1", "idx-a").unwrap();
    store.append("blob-2", "idx-b").unwrap();
    store.append("blob-3", "idx-a").unwrap();

    let hits = store.scan_equal("idx-a").unwrap();
    assert_eq!(
        hits,
        vec![
            StorageRecord {
                id: 1,
                storage_blob: "blob-1".into(),
                blind_index: "idx-a".into(),
            },
            StorageRecord {
                id: 3,
                storage_blob: "blob-3".into(),
                blind_index: "idx-a".into(),
            },
        ]
    );
    assert!(store.scan_equal("idx-c").unwrap().is_empty());
}

#[test]
fn scan_is_exact_not_prefix() {
    let store = MemoryRecordStore::new();
    store.append("blob", "abcdef").unwrap();

    assert!(store.scan_equal("abc").unwrap().is_empty());
    assert!(store.scan_equal("ABCDEF").unwrap().is_empty());
    assert_eq!(store.scan_equal("abcdef").unwrap().len(), 1);
}

#[test]
fn clones_share_records() {
    let store = MemoryRecordStore::new();
    let clone = store.clone();
    store.append("blob", "idx").unwrap();

    assert_eq!(clone.len().unwrap(), 1);
    assert_eq!(clone.records()[0].storage_blob, "blob");
}

#[test]
fn record_serializes_with_wire_field_names() {
    let record = StorageRecord {
        id: 7,
        storage_blob: "b".into(),
        blind_index: "i".into(),
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json, serde_json::json!({"id": 7, "storage_blob": "b", "blind_index": "i"}));
}

// ── Concurrency ──

#[test]
fn concurrent_appends_get_unique_ids() {
    let store = Arc::new(MemoryRecordStore::new());
    let handles: Vec<_> = (0..16)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        store
                            .append(&format!("blob-{t}-{i}"), &format!("idx-{t}-{i}"))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let thread_ids = handle.join().unwrap();
        // Within one thread, later appends always get larger ids.
        assert!(thread_ids.windows(2).all(|w| w[0] < w[1]));
        ids.extend(thread_ids);
    }

    let unique: HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 800);
    assert_eq!(store.len().unwrap(), 800);
    assert_eq!(*ids.iter().max().unwrap(), 800);

    let stored = store.records();
    assert!(stored.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn scans_during_appends_never_see_partial_records() {
    let store = Arc::new(MemoryRecordStore::new());

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..500 {
                store.append(&format!("blob-{i}"), "shared").unwrap();
            }
        })
    };

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..200 {
                for record in store.scan_equal("shared").unwrap() {
                    assert_eq!(record.storage_blob, format!("blob-{}", record.id - 1));
                    assert_eq!(record.blind_index, "shared");
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.scan_equal("shared").unwrap().len(), 500);
}
