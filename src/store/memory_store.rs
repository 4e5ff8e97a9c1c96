// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// memory_store.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::cmp::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::memory_snapshot::MemorySnapshot;
use super::{ReadOnlyStore, Store, StoreSnapshot, WriteStore};
use crate::error::StoreResult;
use crate::seek_direction::SeekDirection;

/// Reference [`Store`] implementation backed by a concurrent map.
///
/// Keys compare by byte-sequence equality. Used for tests and for
/// deterministic single-process deployments; everything here is volatile.
pub struct MemoryStore {
    data: Arc<DashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty MemoryStore.
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Removes all data from the store.
    pub fn reset(&self) {
        self.data.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOnlyStore for MemoryStore {
    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.data.contains_key(key))
    }

    fn seek<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(Vec<u8>, Vec<u8>)>> + 'a> {
        if direction == SeekDirection::Backward && key_or_prefix.is_empty() {
            return Box::new(std::iter::empty());
        }

        // The live map is unordered; the projection is copied out and
        // sorted so concurrent writers cannot shift entries mid-scan.
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = self
            .data
            .iter()
            .filter(|entry| {
                key_or_prefix.is_empty()
                    || direction.compare(entry.key(), key_or_prefix) != Ordering::Less
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| direction.compare(&a.0, &b.0));

        Box::new(entries.into_iter().map(Ok))
    }
}

impl WriteStore for MemoryStore {
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StoreResult<()> {
        self.data.insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.data.remove(key);
        Ok(())
    }
}

impl Store for MemoryStore {
    fn get_snapshot(&self) -> Arc<dyn StoreSnapshot> {
        debug!(entries = self.data.len(), "capturing memory store snapshot");
        Arc::new(MemorySnapshot::new(Arc::clone(&self.data)))
    }
}
