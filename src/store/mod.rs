// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// mod.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Ordered byte store contracts and the reference in-memory backend.
//!
//! Disk-backed engines (LevelDB/RocksDB-style adapters) live in provider
//! crates; they only have to satisfy [`Store`] and [`StoreSnapshot`] to be
//! usable behind a cache.

mod memory_snapshot;
mod memory_store;

use std::sync::Arc;

use crate::error::StoreResult;
use crate::seek_direction::SeekDirection;

pub use memory_snapshot::MemorySnapshot;
pub use memory_store::MemoryStore;

/// Read surface shared by live stores and their snapshots.
///
/// All returned buffers are owned copies; mutating them never corrupts the
/// store's internal state.
pub trait ReadOnlyStore: Send + Sync {
    /// Reads the value for `key`, or `None` if it is absent.
    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Whether the store contains `key`.
    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.try_get(key)?.is_some())
    }

    /// Iterates entries starting at `key_or_prefix` in the given direction.
    ///
    /// `Forward` yields keys `>=` the bound in ascending order; `Backward`
    /// yields keys `<=` the bound in descending order. An empty bound means
    /// "everything" for `Forward` and yields nothing for `Backward` (there
    /// is no well-defined set before an empty key).
    fn seek<'a>(
        &'a self,
        key_or_prefix: &[u8],
        direction: SeekDirection,
    ) -> Box<dyn Iterator<Item = StoreResult<(Vec<u8>, Vec<u8>)>> + 'a>;
}

/// Write surface of a store or snapshot.
///
/// On a live store writes apply immediately; on a snapshot they buffer into
/// the pending batch until [`StoreSnapshot::commit`].
pub trait WriteStore {
    /// Upserts `key` to `value`.
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;
}

/// A live ordered byte store that can hand out isolated snapshots.
pub trait Store: ReadOnlyStore {
    /// Captures a point-in-time snapshot of the store's current contents.
    ///
    /// Writers mutating the live store after this call are invisible to the
    /// returned snapshot.
    fn get_snapshot(&self) -> Arc<dyn StoreSnapshot>;
}

/// A point-in-time view of a store plus a pending write batch.
///
/// Reads never observe the batch. Committing two snapshots of the same
/// store concurrently with overlapping keys is undefined; the contract is
/// single writer per store, documented rather than enforced.
pub trait StoreSnapshot: ReadOnlyStore + WriteStore {
    /// Folds the pending batch into the live store: tombstoned keys are
    /// removed, the rest upserted.
    fn commit(&self) -> StoreResult<()>;
}
