use std::sync::Arc;

use ledger_persistence::{
    DataCache, MemoryStore, ReadOnlyStore, SeekDirection, Store, StoreError, TrackState,
    WriteStore,
};

fn b(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

fn layered_setup() -> (MemoryStore, Arc<DataCache<Vec<u8>, Vec<u8>>>) {
    let store = MemoryStore::new();
    store.put(b("alpha"), b("one")).unwrap();
    let inner = Arc::new(DataCache::from_snapshot(store.get_snapshot()));
    (store, inner)
}

#[test]
fn outer_changes_stay_invisible_until_committed() {
    let (store, inner) = layered_setup();
    let outer = inner.clone_cache();

    outer.add(b("beta"), b("two")).unwrap();
    outer.update(&b("alpha"), &b("uno")).unwrap();

    assert_eq!(inner.try_get(&b("beta")).unwrap(), None);
    assert_eq!(inner.get(&b("alpha")).unwrap(), b("one"));

    outer.commit().unwrap();

    assert_eq!(inner.get(&b("beta")).unwrap(), b("two"));
    assert_eq!(inner.get(&b("alpha")).unwrap(), b("uno"));
    // The inner layer is now dirty; the store is untouched until it
    // commits in turn.
    assert_eq!(store.try_get(&b("beta")).unwrap(), None);

    inner.commit().unwrap();
    assert_eq!(store.try_get(&b("beta")).unwrap(), Some(b("two")));
    assert_eq!(store.try_get(&b("alpha")).unwrap(), Some(b("uno")));
}

#[test]
fn dropping_the_outer_layer_discards_its_changes() {
    let (_store, inner) = layered_setup();
    {
        let outer = inner.clone_cache();
        outer.add(b("beta"), b("two")).unwrap();
        outer.delete(&b("alpha")).unwrap();
    }

    assert_eq!(inner.try_get(&b("beta")).unwrap(), None);
    assert_eq!(inner.get(&b("alpha")).unwrap(), b("one"));
    assert!(inner.get_change_set().unwrap().is_empty());
}

#[test]
fn committed_delete_propagates_one_layer_down() {
    let (_store, inner) = layered_setup();
    let outer = inner.clone_cache();

    outer.delete(&b("alpha")).unwrap();
    outer.commit().unwrap();

    assert_eq!(inner.try_get(&b("alpha")).unwrap(), None);
    let change_set = inner.get_change_set().unwrap();
    assert_eq!(change_set.len(), 1);
    assert_eq!(change_set[0].1.state, TrackState::Deleted);
}

#[test]
fn committed_add_lands_as_added_in_the_inner_layer() {
    let (_store, inner) = layered_setup();
    let outer = inner.clone_cache();

    outer.add(b("beta"), b("two")).unwrap();
    outer.commit().unwrap();

    let change_set = inner.get_change_set().unwrap();
    assert_eq!(change_set.len(), 1);
    assert_eq!(change_set[0].0, b("beta"));
    assert_eq!(change_set[0].1.state, TrackState::Added);
}

#[test]
fn layers_nest_to_arbitrary_depth() {
    let (store, inner) = layered_setup();
    let middle = Arc::new(inner.clone_cache());
    let outer = middle.clone_cache();

    outer.add(b("beta"), b("two")).unwrap();
    assert_eq!(outer.get(&b("alpha")).unwrap(), b("one"));

    outer.commit().unwrap();
    assert_eq!(middle.try_get(&b("beta")).unwrap(), Some(b("two")));
    assert_eq!(inner.try_get(&b("beta")).unwrap(), None);

    middle.commit().unwrap();
    assert_eq!(inner.try_get(&b("beta")).unwrap(), Some(b("two")));
    assert_eq!(store.try_get(&b("beta")).unwrap(), None);
}

#[test]
fn outer_mutations_never_alias_inner_values() {
    let (_store, inner) = layered_setup();
    let outer = inner.clone_cache();

    let value = outer.get_and_change(&b("alpha")).unwrap().unwrap();
    assert_eq!(value, b("one"));
    // The outer layer holds its own copy; the inner entry is untouched
    // until the change is committed back.
    outer.update(&b("alpha"), &b("mutated")).unwrap();
    assert_eq!(inner.get(&b("alpha")).unwrap(), b("one"));
}

#[test]
fn committing_an_update_for_a_key_deleted_underneath_fails() {
    let (_store, inner) = layered_setup();
    let outer = inner.clone_cache();

    outer.get_and_change(&b("alpha")).unwrap();
    inner.delete(&b("alpha")).unwrap();

    assert_eq!(outer.commit(), Err(StoreError::KeyNotFound));
}

#[test]
fn find_descends_through_every_layer() {
    let store = MemoryStore::new();
    store.put(b("a"), b("1")).unwrap();
    let inner = Arc::new(DataCache::from_snapshot(store.get_snapshot()));
    inner.add(b("b"), b("2")).unwrap();
    let outer = inner.clone_cache();
    outer.add(b("c"), b("3")).unwrap();

    let keys: Vec<_> = outer
        .find(None, SeekDirection::Forward)
        .unwrap()
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(keys, vec![b("a"), b("b"), b("c")]);

    let explicit_empty: Vec<_> = outer
        .find(Some(b"".as_slice()), SeekDirection::Forward)
        .unwrap()
        .map(|entry| entry.unwrap().0)
        .collect();
    assert_eq!(explicit_empty, keys);
}
