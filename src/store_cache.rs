// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// store_cache.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::{CacheKey, CacheValue};
use crate::data_cache::{CacheBacking, DataCache};
use crate::error::{StoreError, StoreResult};
use crate::seek_direction::SeekDirection;
use crate::store::{Store, StoreSnapshot};

/// A [`DataCache`] bound to a raw ordered byte store.
///
/// Purely a naming convention for caches built with
/// [`DataCache::from_store`] or [`DataCache::from_snapshot`]; the alias adds
/// no type distinction of its own.
pub type StoreCache<K, V> = DataCache<K, V>;

enum StoreHandle {
    /// Live store, read-only from the cache's point of view.
    Store(Arc<dyn Store>),
    /// Isolated snapshot; writes buffer into its batch until commit.
    Snapshot(Arc<dyn StoreSnapshot>),
}

impl StoreHandle {
    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self {
            StoreHandle::Store(store) => store.try_get(key),
            StoreHandle::Snapshot(snapshot) => snapshot.try_get(key),
        }
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        match self {
            StoreHandle::Store(store) => store.contains(key),
            StoreHandle::Snapshot(snapshot) => snapshot.contains(key),
        }
    }

    fn seek<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(Vec<u8>, Vec<u8>)>> + 'a> {
        match self {
            StoreHandle::Store(store) => store.seek(key_or_prefix, direction),
            StoreHandle::Snapshot(snapshot) => snapshot.seek(key_or_prefix, direction),
        }
    }
}

/// Backing adapter translating domain keys and values to and from the raw
/// bytes of an ordered store.
///
/// A scan pair whose key or value fails to decode surfaces
/// [`StoreError::Corrupted`] through the iterator; that means a broken
/// provider, not bad caller input.
pub struct StoreBacking<K, V> {
    handle: StoreHandle,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> StoreBacking<K, V> {
    /// Adapter over a live store. Writes are rejected; pair this with a
    /// read-only cache.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self {
            handle: StoreHandle::Store(store),
            _marker: PhantomData,
        }
    }

    /// Adapter over a snapshot; commit folds the snapshot batch into the
    /// live store.
    pub fn with_snapshot(snapshot: Arc<dyn StoreSnapshot>) -> Self {
        Self {
            handle: StoreHandle::Snapshot(snapshot),
            _marker: PhantomData,
        }
    }
}

impl<K: CacheKey, V: CacheValue> CacheBacking<K, V> for StoreBacking<K, V> {
    fn try_load(&self, key: &K) -> StoreResult<Option<V>> {
        match self.handle.try_get(&key.to_bytes())? {
            Some(bytes) => Ok(Some(V::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn contains_in_store(&self, key: &K) -> StoreResult<bool> {
        self.handle.contains(&key.to_bytes())
    }

    fn scan_store<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(K, V)>> + 'a> {
        Box::new(
            self.handle
                .seek(key_or_prefix, direction)
                .map(|entry| {
                    let (key_bytes, value_bytes) = entry?;
                    let key = K::from_bytes(&key_bytes).map_err(|_| {
                        StoreError::corrupted(format!(
                            "undecodable key {} in store scan",
                            hex::encode(&key_bytes)
                        ))
                    })?;
                    let value = V::from_bytes(&value_bytes)?;
                    Ok((key, value))
                }),
        )
    }

    fn write_added(&self, key: &K, value: &V) -> StoreResult<()> {
        match &self.handle {
            StoreHandle::Snapshot(snapshot) => snapshot.put(key.to_bytes(), value.to_bytes()),
            StoreHandle::Store(_) => Err(StoreError::ReadOnly),
        }
    }

    fn write_updated(&self, key: &K, value: &V) -> StoreResult<()> {
        // Raw stores upsert; the added/updated distinction only matters
        // to layered backings.
        self.write_added(key, value)
    }

    fn write_deleted(&self, key: &K) -> StoreResult<()> {
        match &self.handle {
            StoreHandle::Snapshot(snapshot) => snapshot.delete(&key.to_bytes()),
            StoreHandle::Store(_) => Err(StoreError::ReadOnly),
        }
    }

    fn on_commit(&self) -> StoreResult<()> {
        match &self.handle {
            StoreHandle::Snapshot(snapshot) => snapshot.commit(),
            StoreHandle::Store(_) => Err(StoreError::ReadOnly),
        }
    }
}

impl<K: CacheKey, V: CacheValue> DataCache<K, V> {
    /// Creates a read-only cache over a live store.
    ///
    /// Reads observe the store's current contents; every mutation fails
    /// with [`StoreError::ReadOnly`].
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        DataCache::new(Box::new(StoreBacking::with_store(store)), true)
    }

    /// Creates a writable cache over a store snapshot.
    ///
    /// Reads observe the snapshot's point-in-time view; `commit` flushes
    /// the change set into the snapshot batch and then folds the batch
    /// into the live store.
    pub fn from_snapshot(snapshot: Arc<dyn StoreSnapshot>) -> Self {
        DataCache::new(Box::new(StoreBacking::with_snapshot(snapshot)), false)
    }
}
