// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// lib.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Transactional, layered key-value caching over ordered byte stores.
//!
//! The core type is [`DataCache`]: an overlay of tracked entries over a
//! backing source, with per-entry [`TrackState`] bookkeeping, a change set
//! of dirty keys, and ordered iteration that merges the overlay with the
//! backing contents. Concrete backings bind a cache to a raw
//! [`Store`]/[`StoreSnapshot`] pair or layer it over another cache so
//! speculative work can be committed or discarded wholesale.
//!
//! [`MemoryStore`] provides the in-process store implementation used for
//! tests and deterministic simulations.

mod cloned_cache;
mod codec;
mod data_cache;
mod error;
mod seek;
mod seek_direction;
mod store;
mod store_cache;
mod track_state;

pub use cloned_cache::ClonedBacking;
pub use codec::{CacheKey, CacheValue};
pub use data_cache::{CacheBacking, DataCache, EntryCallback};
pub use error::{StoreError, StoreResult};
pub use seek::{FindIter, RangeIter, SeekIter};
pub use seek_direction::SeekDirection;
pub use store::{
    MemorySnapshot, MemoryStore, ReadOnlyStore, Store, StoreSnapshot, WriteStore,
};
pub use store_cache::{StoreBacking, StoreCache};
pub use track_state::{TrackState, Trackable};
