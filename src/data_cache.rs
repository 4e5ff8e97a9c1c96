// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// data_cache.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::cmp::Ordering;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::codec::{CacheKey, CacheValue};
use crate::error::{StoreError, StoreResult};
use crate::seek::{prefix_successor, FindIter, RangeIter, SeekIter};
use crate::seek_direction::SeekDirection;
use crate::track_state::{TrackState, Trackable};

/// Collaborator hooks a concrete cache adapter must supply.
///
/// The cache delegates every miss and every commit-time write to these;
/// [`crate::StoreBacking`] binds them to a raw byte store and
/// [`crate::ClonedBacking`] to another cache. Errors raised here propagate
/// to the caller unchanged.
pub trait CacheBacking<K, V>: Send + Sync {
    /// Reads `key` from the backing source, failing with
    /// [`StoreError::KeyNotFound`] when absent.
    fn load(&self, key: &K) -> StoreResult<V> {
        self.try_load(key)?.ok_or(StoreError::KeyNotFound)
    }

    /// Reads `key` from the backing source, or `None` when absent.
    fn try_load(&self, key: &K) -> StoreResult<Option<V>>;

    /// Whether the backing source contains `key`.
    fn contains_in_store(&self, key: &K) -> StoreResult<bool>;

    /// Iterates the backing source starting at `key_or_prefix` in the
    /// given direction. An empty bound means "everything" for `Forward`
    /// and nothing for `Backward`.
    ///
    /// The returned iterator must not retain `key_or_prefix`.
    fn scan_store<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(K, V)>> + 'a>;

    /// Writes a new record to the backing source.
    fn write_added(&self, key: &K, value: &V) -> StoreResult<()>;

    /// Updates an existing record in the backing source.
    fn write_updated(&self, key: &K, value: &V) -> StoreResult<()>;

    /// Removes a record from the backing source.
    fn write_deleted(&self, key: &K) -> StoreResult<()>;

    /// Invoked after a successful [`DataCache::commit`] flush, letting the
    /// adapter fold a buffered snapshot batch into its store.
    fn on_commit(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Observer invoked with the key and value of a cache event.
pub type EntryCallback<K, V> = Box<dyn Fn(&K, &V) + Send + Sync>;

struct CacheInner<K, V> {
    dictionary: HashMap<K, Trackable<V>>,
    /// `None` marks a read-only cache; mutating operations are illegal.
    change_set: Option<HashSet<K>>,
}

/// Transactional cache layered over a backing source.
///
/// Maintains an overlay of touched entries, each tagged with a
/// [`TrackState`], plus the change set of dirty keys. Reads fall through
/// to the backing source on miss and memoize the result; writes stay in
/// the overlay until [`DataCache::commit`] flushes them through the
/// [`CacheBacking`] hooks.
///
/// A single mutex guards the overlay. The cache is intended for one
/// logical writer at a time; concurrent readers are safe, but interleaved
/// mutators may observe each other's failures (e.g. two racing `add`s on
/// one key).
pub struct DataCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    backing: Box<dyn CacheBacking<K, V>>,
    on_read: RwLock<Vec<EntryCallback<K, V>>>,
    on_update: RwLock<Vec<EntryCallback<K, V>>>,
}

impl<K: CacheKey, V: CacheValue> DataCache<K, V> {
    /// Creates a cache over the given backing collaborator. A read-only
    /// cache carries no change set and rejects every mutation.
    pub fn new(backing: Box<dyn CacheBacking<K, V>>, read_only: bool) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                dictionary: HashMap::new(),
                change_set: if read_only { None } else { Some(HashSet::new()) },
            }),
            backing,
            on_read: RwLock::new(Vec::new()),
            on_update: RwLock::new(Vec::new()),
        }
    }

    /// Returns true if the cache has no change set.
    pub fn is_read_only(&self) -> bool {
        self.inner.lock().change_set.is_none()
    }

    /// Registers a callback fired after an entry is loaded from the
    /// backing source.
    pub fn on_read(&self, callback: EntryCallback<K, V>) {
        self.on_read.write().push(callback);
    }

    /// Registers a callback fired when a changed entry is flushed to the
    /// backing source during commit.
    pub fn on_update(&self, callback: EntryCallback<K, V>) {
        self.on_update.write().push(callback);
    }

    fn notify_read(&self, key: &K, value: &V) {
        for callback in self.on_read.read().iter() {
            callback(key, value);
        }
    }

    fn notify_update(&self, key: &K, value: &V) {
        for callback in self.on_update.read().iter() {
            callback(key, value);
        }
    }

    /// Reads the entry for `key`, loading it from the backing source on a
    /// miss and memoizing it as clean.
    ///
    /// Fails with [`StoreError::KeyNotFound`] when the key is absent
    /// everywhere or the overlay marks it deleted.
    pub fn get(&self, key: &K) -> StoreResult<V> {
        let value;
        {
            let mut guard = self.inner.lock();
            match guard.dictionary.get(key) {
                Some(trackable) if !trackable.state.is_live() => {
                    return Err(StoreError::KeyNotFound)
                }
                Some(trackable) => return Ok(trackable.item.clone()),
                None => {}
            }
            let item = self.backing.load(key)?;
            value = item.clone();
            guard
                .dictionary
                .insert(key.clone(), Trackable::new(item, TrackState::None));
        }
        self.notify_read(key, &value);
        Ok(value)
    }

    /// Like [`DataCache::get`] but returns `None` instead of failing.
    ///
    /// A backing-source miss is not memoized; repeated lookups of an
    /// absent key re-query the backing source each time.
    pub fn try_get(&self, key: &K) -> StoreResult<Option<V>> {
        let value;
        {
            let mut guard = self.inner.lock();
            match guard.dictionary.get(key) {
                Some(trackable) if !trackable.state.is_live() => return Ok(None),
                Some(trackable) => return Ok(Some(trackable.item.clone())),
                None => {}
            }
            match self.backing.try_load(key)? {
                None => return Ok(None),
                Some(item) => {
                    value = item.clone();
                    guard
                        .dictionary
                        .insert(key.clone(), Trackable::new(item, TrackState::None));
                }
            }
        }
        self.notify_read(key, &value);
        Ok(Some(value))
    }

    /// Whether `key` is visible through this cache.
    pub fn contains(&self, key: &K) -> StoreResult<bool> {
        let guard = self.inner.lock();
        if let Some(trackable) = guard.dictionary.get(key) {
            return Ok(trackable.state.is_live());
        }
        self.backing.contains_in_store(key)
    }

    /// Inserts a new entry into the overlay as [`TrackState::Added`].
    ///
    /// Does not probe the backing source. Re-adding a key the overlay has
    /// marked `Deleted` resurrects it as `Changed`; re-adding a `NotFound`
    /// key resurrects it as `Added`. Any other resident state fails with
    /// [`StoreError::DuplicateKey`].
    pub fn add(&self, key: K, value: V) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let Some(change_set) = inner.change_set.as_mut() else {
            return Err(StoreError::ReadOnly);
        };
        match inner.dictionary.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let trackable = occupied.get_mut();
                trackable.state = match trackable.state {
                    TrackState::Deleted => TrackState::Changed,
                    TrackState::NotFound => TrackState::Added,
                    _ => return Err(StoreError::DuplicateKey),
                };
                trackable.item = value;
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Trackable::new(value, TrackState::Added));
            }
        }
        change_set.insert(key);
        Ok(())
    }

    /// Marks `key` for deletion.
    ///
    /// An entry that was only `Added` reverts to `NotFound` (never
    /// existed) and leaves the change set. An untouched key is probed in
    /// the backing source first: absent means no-op, present is cached as
    /// `Deleted`.
    pub fn delete(&self, key: &K) -> StoreResult<()> {
        let mut loaded = None;
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(change_set) = inner.change_set.as_mut() else {
                return Err(StoreError::ReadOnly);
            };
            if let Some(trackable) = inner.dictionary.get_mut(key) {
                match trackable.state {
                    TrackState::Added => {
                        trackable.state = TrackState::NotFound;
                        change_set.remove(key);
                    }
                    TrackState::Deleted | TrackState::NotFound => {}
                    _ => {
                        trackable.state = TrackState::Deleted;
                        change_set.insert(key.clone());
                    }
                }
            } else {
                match self.backing.try_load(key)? {
                    None => return Ok(()),
                    Some(item) => {
                        loaded = Some(item.clone());
                        inner
                            .dictionary
                            .insert(key.clone(), Trackable::new(item, TrackState::Deleted));
                        change_set.insert(key.clone());
                    }
                }
            }
        }
        if let Some(value) = loaded {
            self.notify_read(key, &value);
        }
        Ok(())
    }

    /// Merges `replica` into the tracked value for `key` in place and
    /// promotes a clean entry to [`TrackState::Changed`].
    ///
    /// The target must exist in the overlay or the backing source; a
    /// deleted or absent key fails with [`StoreError::KeyNotFound`].
    pub fn update(&self, key: &K, replica: &V) -> StoreResult<()> {
        let mut loaded = None;
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(change_set) = inner.change_set.as_mut() else {
                return Err(StoreError::ReadOnly);
            };
            if let Some(trackable) = inner.dictionary.get_mut(key) {
                match trackable.state {
                    TrackState::Deleted | TrackState::NotFound => {
                        return Err(StoreError::KeyNotFound)
                    }
                    TrackState::None => {
                        trackable.state = TrackState::Changed;
                        change_set.insert(key.clone());
                    }
                    _ => {}
                }
                trackable.item.from_replica(replica);
            } else {
                let mut item = self.backing.load(key)?;
                loaded = Some(item.clone());
                item.from_replica(replica);
                inner
                    .dictionary
                    .insert(key.clone(), Trackable::new(item, TrackState::Changed));
                change_set.insert(key.clone());
            }
        }
        if let Some(value) = loaded {
            self.notify_read(key, &value);
        }
        Ok(())
    }

    /// Shared body of the read-for-mutation operations.
    ///
    /// `mark_changed` distinguishes `get_and_change` (a clean entry is
    /// promoted to `Changed`) from `get_or_add` (it stays clean). Returns
    /// `None` only when the key is absent and no factory was supplied.
    fn read_for_write(
        &self,
        key: &K,
        factory: Option<Box<dyn FnOnce() -> V + '_>>,
        mark_changed: bool,
    ) -> StoreResult<Option<V>> {
        let mut loaded = None;
        let result;
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(change_set) = inner.change_set.as_mut() else {
                return Err(StoreError::ReadOnly);
            };
            if let Some(trackable) = inner.dictionary.get_mut(key) {
                match trackable.state {
                    TrackState::Deleted | TrackState::NotFound => {
                        let Some(factory) = factory else {
                            return Ok(None);
                        };
                        trackable.item = factory();
                        if trackable.state == TrackState::Deleted {
                            trackable.state = TrackState::Changed;
                        } else {
                            trackable.state = TrackState::Added;
                            change_set.insert(key.clone());
                        }
                    }
                    TrackState::None if mark_changed => {
                        trackable.state = TrackState::Changed;
                        change_set.insert(key.clone());
                    }
                    _ => {}
                }
                result = trackable.item.clone();
            } else {
                let (item, state) = match self.backing.try_load(key)? {
                    Some(item) => {
                        loaded = Some(item.clone());
                        let state = if mark_changed {
                            TrackState::Changed
                        } else {
                            TrackState::None
                        };
                        (item, state)
                    }
                    None => {
                        let Some(factory) = factory else {
                            return Ok(None);
                        };
                        (factory(), TrackState::Added)
                    }
                };
                if state != TrackState::None {
                    change_set.insert(key.clone());
                }
                result = item.clone();
                inner.dictionary.insert(key.clone(), Trackable::new(item, state));
            }
        }
        if let Some(value) = loaded {
            self.notify_read(key, &value);
        }
        Ok(Some(result))
    }

    /// Reads `key` for mutation: promotes a clean entry to
    /// [`TrackState::Changed`], loading from the backing source on a miss.
    /// Returns `None` when the key is absent everywhere.
    pub fn get_and_change(&self, key: &K) -> StoreResult<Option<V>> {
        self.read_for_write(key, None, true)
    }

    /// Like [`DataCache::get_and_change`], creating the entry as
    /// [`TrackState::Added`] via `factory` when it is absent. The factory
    /// is not invoked for an existing entry.
    pub fn get_and_change_or_insert<F>(&self, key: &K, factory: F) -> StoreResult<V>
    where
        F: FnOnce() -> V,
    {
        self.read_for_write(key, Some(Box::new(factory)), true)?
            .ok_or(StoreError::KeyNotFound)
    }

    /// Reads `key`, creating it via `factory` when absent. Unlike
    /// [`DataCache::get_and_change_or_insert`] an existing clean entry is
    /// not promoted to `Changed`.
    pub fn get_or_add<F>(&self, key: &K, factory: F) -> StoreResult<V>
    where
        F: FnOnce() -> V,
    {
        self.read_for_write(key, Some(Box::new(factory)), false)?
            .ok_or(StoreError::KeyNotFound)
    }

    /// Flushes the change set through the backing hooks and clears it.
    ///
    /// `Added` entries become clean after `write_added`, `Changed` after
    /// `write_updated`, and `Deleted` entries are evicted after
    /// `write_deleted`. A failure mid-flush leaves earlier keys already
    /// written; the caller must not retry without reconciling state.
    pub fn commit(&self) -> StoreResult<()> {
        let mut updated = Vec::new();
        let mut added = 0usize;
        let removed;
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let Some(change_set) = inner.change_set.as_mut() else {
                return Err(StoreError::ReadOnly);
            };
            let mut deleted = Vec::new();
            for key in change_set.iter() {
                let Some(trackable) = inner.dictionary.get_mut(key) else {
                    continue;
                };
                match trackable.state {
                    TrackState::Added => {
                        self.backing.write_added(key, &trackable.item)?;
                        trackable.state = TrackState::None;
                        added += 1;
                    }
                    TrackState::Changed => {
                        self.backing.write_updated(key, &trackable.item)?;
                        trackable.state = TrackState::None;
                        updated.push((key.clone(), trackable.item.clone()));
                    }
                    TrackState::Deleted => {
                        self.backing.write_deleted(key)?;
                        deleted.push(key.clone());
                    }
                    _ => {}
                }
            }
            for key in &deleted {
                inner.dictionary.remove(key);
            }
            change_set.clear();
            removed = deleted.len();
        }
        debug!(
            added,
            changed = updated.len(),
            removed,
            "committed cache change set"
        );
        self.backing.on_commit()?;
        for (key, value) in &updated {
            self.notify_update(key, value);
        }
        Ok(())
    }

    /// Snapshots the dirty entries: exactly the keys whose state is not
    /// [`TrackState::None`]. Fails with [`StoreError::ReadOnly`] on a
    /// cache built without a change set.
    pub fn get_change_set(&self) -> StoreResult<Vec<(K, Trackable<V>)>> {
        let guard = self.inner.lock();
        let Some(change_set) = guard.change_set.as_ref() else {
            return Err(StoreError::ReadOnly);
        };
        Ok(change_set
            .iter()
            .filter_map(|key| {
                guard
                    .dictionary
                    .get(key)
                    .map(|trackable| (key.clone(), trackable.clone()))
            })
            .collect())
    }

    /// Iterates the merged view of the overlay and the backing source
    /// starting at `key_or_prefix`, in byte-lexicographic order for
    /// `Forward` and reverse order for `Backward`.
    ///
    /// The overlay projection is snapshotted under the lock; the backing
    /// stream stays lazy, so entries touched after this call may or may
    /// not be reflected in the backing portion of the sequence.
    pub fn seek(&self, key_or_prefix: Option<&[u8]>, direction: SeekDirection) -> SeekIter<'_, K, V> {
        let filter = key_or_prefix.map(|bound| bound.to_vec());
        let scan_bound = key_or_prefix.unwrap_or(&[]).to_vec();
        let (cached, cached_keys) = {
            let guard = self.inner.lock();
            let mut cached: Vec<(Vec<u8>, K, V)> = guard
                .dictionary
                .iter()
                .filter(|(_, trackable)| trackable.state.is_live())
                .filter_map(|(key, trackable)| {
                    let bytes = key.to_bytes();
                    let in_range = match &filter {
                        None => true,
                        Some(bound) => direction.compare(&bytes, bound) != Ordering::Less,
                    };
                    in_range.then(|| (bytes, key.clone(), trackable.item.clone()))
                })
                .collect();
            cached.sort_by(|a, b| direction.compare(&a.0, &b.0));
            let cached_keys: HashSet<K> = guard.dictionary.keys().cloned().collect();
            (cached, cached_keys)
        };
        let uncached = self.backing.scan_store(&scan_bound, direction);
        SeekIter::new(cached, cached_keys, uncached, direction)
    }

    /// Iterates the entries whose keys start with `key_prefix`.
    ///
    /// `Backward` requires a non-empty prefix with a well-defined
    /// successor; an empty or all-`0xff` prefix fails with
    /// [`StoreError::UnsupportedRange`].
    pub fn find(
        &self,
        key_prefix: Option<&[u8]>,
        direction: SeekDirection,
    ) -> StoreResult<FindIter<'_, K, V>> {
        let prefix = key_prefix.unwrap_or(&[]).to_vec();
        let seek_bound = match direction {
            SeekDirection::Forward => prefix.clone(),
            SeekDirection::Backward => {
                prefix_successor(&prefix).ok_or(StoreError::UnsupportedRange)?
            }
        };
        let seek = self.seek(Some(&seek_bound), direction);
        Ok(FindIter::new(seek, prefix, seek_bound, direction))
    }

    /// Iterates the entries in the half-open range `[start, end)`,
    /// stopping as soon as the direction comparator reports the boundary
    /// crossed.
    pub fn find_range(
        &self,
        start: &[u8],
        end: &[u8],
        direction: SeekDirection,
    ) -> RangeIter<'_, K, V> {
        let seek = self.seek(Some(start), direction);
        RangeIter::new(seek, end.to_vec(), direction)
    }
}
