// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// cloned_cache.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::sync::Arc;

use crate::codec::{CacheKey, CacheValue};
use crate::data_cache::{CacheBacking, DataCache};
use crate::error::StoreResult;
use crate::seek_direction::SeekDirection;

/// Backing adapter that layers a [`DataCache`] over another [`DataCache`].
///
/// Every value crossing the boundary is a clone, so the outer layer can
/// mutate freely and then be dropped without leaking partial state into
/// the inner layer. Commit-time updates merge into the inner layer's
/// existing value in place via `from_replica` rather than swapping it,
/// keeping other holders of that value current.
///
/// A chain of layered caches acquires locks strictly outer to inner
/// during a single call, so no ordering cycles are possible.
pub struct ClonedBacking<K, V> {
    inner: Arc<DataCache<K, V>>,
}

impl<K, V> ClonedBacking<K, V> {
    pub fn new(inner: Arc<DataCache<K, V>>) -> Self {
        Self { inner }
    }
}

impl<K: CacheKey, V: CacheValue> CacheBacking<K, V> for ClonedBacking<K, V> {
    fn load(&self, key: &K) -> StoreResult<V> {
        // `get` already clones out of the inner overlay.
        self.inner.get(key)
    }

    fn try_load(&self, key: &K) -> StoreResult<Option<V>> {
        self.inner.try_get(key)
    }

    fn contains_in_store(&self, key: &K) -> StoreResult<bool> {
        self.inner.contains(key)
    }

    fn scan_store<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(K, V)>> + 'a> {
        Box::new(self.inner.seek(Some(key_or_prefix), direction))
    }

    fn write_added(&self, key: &K, value: &V) -> StoreResult<()> {
        self.inner.add(key.clone(), value.clone())
    }

    fn write_updated(&self, key: &K, value: &V) -> StoreResult<()> {
        self.inner.update(key, value)
    }

    fn write_deleted(&self, key: &K) -> StoreResult<()> {
        self.inner.delete(key)
    }
}

impl<K: CacheKey, V: CacheValue> DataCache<K, V> {
    /// Creates a new writable cache layered over `self`.
    ///
    /// The clone can be mutated and committed back into this cache, or
    /// simply dropped to discard its speculative changes. Layers nest to
    /// arbitrary depth, e.g. one per transaction within a block.
    pub fn clone_cache(self: &Arc<Self>) -> DataCache<K, V> {
        DataCache::new(Box::new(ClonedBacking::new(Arc::clone(self))), false)
    }
}
