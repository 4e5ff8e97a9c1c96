// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// track_state.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

/// Lifecycle state of a cached entry relative to the backing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackState {
    /// The value came from the backing source and is unmodified; the
    /// entry is not in the change set.
    #[default]
    None,
    /// The value exists only in the overlay and will be written as a new
    /// record on commit.
    Added,
    /// The value originated in the backing source but has been mutated
    /// in the overlay.
    Changed,
    /// The value must be removed from the backing source on commit; the
    /// entry stays resident until the commit completes.
    Deleted,
    /// The overlay recorded that this key does not exist. Deleting an
    /// entry that was only `Added` reverts to this state rather than to
    /// `Deleted`.
    NotFound,
}

impl TrackState {
    /// Whether an entry in this state is visible to readers.
    pub fn is_live(self) -> bool {
        !matches!(self, TrackState::Deleted | TrackState::NotFound)
    }
}

/// Represents an entry in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trackable<V> {
    /// The data of the entry.
    pub item: V,
    /// The state of the entry.
    pub state: TrackState,
}

impl<V> Trackable<V> {
    /// Creates a new Trackable.
    pub fn new(item: V, state: TrackState) -> Self {
        Self { item, state }
    }
}
