// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// memory_snapshot.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::{ReadOnlyStore, StoreSnapshot, WriteStore};
use crate::error::StoreResult;
use crate::seek_direction::SeekDirection;

/// Isolated view of a [`super::MemoryStore`] at the moment of creation.
///
/// Reads go through an immutable sorted copy of the live contents; writes
/// buffer into a pending batch (`None` = tombstone) that only becomes
/// visible in the live store after [`StoreSnapshot::commit`].
pub struct MemorySnapshot {
    immutable: BTreeMap<Vec<u8>, Vec<u8>>,
    batch: Mutex<BTreeMap<Vec<u8>, Option<Vec<u8>>>>,
    live: Arc<DashMap<Vec<u8>, Vec<u8>>>,
}

impl MemorySnapshot {
    pub(super) fn new(live: Arc<DashMap<Vec<u8>, Vec<u8>>>) -> Self {
        let immutable = live
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        Self {
            immutable,
            batch: Mutex::new(BTreeMap::new()),
            live,
        }
    }

    /// Number of buffered, uncommitted operations.
    pub fn pending_len(&self) -> usize {
        self.batch.lock().len()
    }
}

impl ReadOnlyStore for MemorySnapshot {
    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.immutable.get(key).cloned())
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.immutable.contains_key(key))
    }

    fn seek<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(Vec<u8>, Vec<u8>)>> + 'a> {
        match direction {
            SeekDirection::Forward => Box::new(
                self.immutable
                    .range::<[u8], _>((Bound::Included(key_or_prefix), Bound::Unbounded))
                    .map(|(key, value)| Ok((key.clone(), value.clone()))),
            ),
            SeekDirection::Backward => {
                if key_or_prefix.is_empty() {
                    return Box::new(std::iter::empty());
                }
                Box::new(
                    self.immutable
                        .range::<[u8], _>((Bound::Unbounded, Bound::Included(key_or_prefix)))
                        .rev()
                        .map(|(key, value)| Ok((key.clone(), value.clone()))),
                )
            }
        }
    }
}

impl WriteStore for MemorySnapshot {
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StoreResult<()> {
        self.batch.lock().insert(key, Some(value));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.batch.lock().insert(key.to_vec(), None);
        Ok(())
    }
}

impl StoreSnapshot for MemorySnapshot {
    fn commit(&self) -> StoreResult<()> {
        let mut batch = self.batch.lock();
        debug!(operations = batch.len(), "applying snapshot batch");
        for (key, value) in std::mem::take(&mut *batch) {
            match value {
                Some(value) => {
                    self.live.insert(key, value);
                }
                None => {
                    self.live.remove(&key);
                }
            }
        }
        Ok(())
    }
}
