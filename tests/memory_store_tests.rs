use ledger_persistence::{
    MemoryStore, ReadOnlyStore, SeekDirection, Store, StoreSnapshot, WriteStore,
};

fn b(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for i in 1u8..=3 {
        store.put(vec![i], vec![i * 10]).unwrap();
    }
    store
}

#[test]
fn snapshot_ignores_later_store_writes() {
    let store = MemoryStore::new();
    store.put(b("alpha"), b("one")).unwrap();
    let snapshot = store.get_snapshot();
    store.put(b("beta"), b("two")).unwrap();
    store.delete(&b("alpha")).unwrap();

    assert_eq!(snapshot.try_get(&b("alpha")).unwrap(), Some(b("one")));
    assert_eq!(snapshot.try_get(&b("beta")).unwrap(), None);
    assert!(snapshot.contains(&b("alpha")).unwrap());
}

#[test]
fn buffered_writes_are_invisible_until_commit() {
    let store = MemoryStore::new();
    let snapshot = store.get_snapshot();

    snapshot.put(b("alpha"), b("one")).unwrap();
    assert_eq!(snapshot.try_get(&b("alpha")).unwrap(), None);
    assert_eq!(store.try_get(&b("alpha")).unwrap(), None);

    snapshot.commit().unwrap();
    assert_eq!(store.try_get(&b("alpha")).unwrap(), Some(b("one")));
    // Snapshot reads keep serving the captured view even after commit.
    assert_eq!(snapshot.try_get(&b("alpha")).unwrap(), None);
}

#[test]
fn tombstones_remove_keys_on_commit() {
    let store = MemoryStore::new();
    store.put(b("alpha"), b("one")).unwrap();
    let snapshot = store.get_snapshot();

    snapshot.delete(&b("alpha")).unwrap();
    assert_eq!(store.try_get(&b("alpha")).unwrap(), Some(b("one")));

    snapshot.commit().unwrap();
    assert_eq!(store.try_get(&b("alpha")).unwrap(), None);
    assert_eq!(snapshot.try_get(&b("alpha")).unwrap(), Some(b("one")));
}

#[test]
fn later_writes_to_the_same_key_win_within_a_batch() {
    let store = MemoryStore::new();
    let snapshot = store.get_snapshot();

    snapshot.put(b("alpha"), b("one")).unwrap();
    snapshot.put(b("alpha"), b("two")).unwrap();
    snapshot.put(b("beta"), b("x")).unwrap();
    snapshot.delete(&b("beta")).unwrap();
    snapshot.commit().unwrap();

    assert_eq!(store.try_get(&b("alpha")).unwrap(), Some(b("two")));
    assert_eq!(store.try_get(&b("beta")).unwrap(), None);
}

#[test]
fn independent_snapshots_carry_independent_batches() {
    let store = MemoryStore::new();
    let first = store.get_snapshot();
    let second = store.get_snapshot();

    first.put(b("alpha"), b("one")).unwrap();
    second.put(b("beta"), b("two")).unwrap();

    first.commit().unwrap();
    assert_eq!(store.try_get(&b("alpha")).unwrap(), Some(b("one")));
    assert_eq!(store.try_get(&b("beta")).unwrap(), None);

    second.commit().unwrap();
    assert_eq!(store.try_get(&b("beta")).unwrap(), Some(b("two")));
}

#[test]
fn store_seek_is_ordered_in_both_directions() {
    let store = seeded_store();

    let forward: Vec<_> = store
        .seek(&[2], SeekDirection::Forward)
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(forward, vec![vec![2], vec![3]]);

    let backward: Vec<_> = store
        .seek(&[2], SeekDirection::Backward)
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(backward, vec![vec![2], vec![1]]);

    let all: Vec<_> = store
        .seek(&[], SeekDirection::Forward)
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(all, vec![vec![1], vec![2], vec![3]]);
}

#[test]
fn backward_seek_from_an_empty_bound_yields_nothing() {
    let store = seeded_store();
    assert_eq!(store.seek(&[], SeekDirection::Backward).count(), 0);

    let snapshot = store.get_snapshot();
    assert_eq!(snapshot.seek(&[], SeekDirection::Backward).count(), 0);
}

#[test]
fn snapshot_seek_matches_the_captured_view() {
    let store = seeded_store();
    let snapshot = store.get_snapshot();
    store.put(vec![4], vec![40]).unwrap();

    let keys: Vec<_> = snapshot
        .seek(&[], SeekDirection::Forward)
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(keys, vec![vec![1], vec![2], vec![3]]);
}

#[test]
fn reset_empties_the_store() {
    let store = seeded_store();
    assert_eq!(store.len(), 3);
    assert!(!store.is_empty());

    store.reset();
    assert!(store.is_empty());
    assert_eq!(store.try_get(&[1]).unwrap(), None);
}
