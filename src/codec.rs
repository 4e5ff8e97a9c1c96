// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// codec.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Capability traits required of domain key and value types.
//!
//! The cache core treats keys as opaque byte-ordered identifiers and values
//! as opaque cloneable blobs. The ledger layer supplies the concrete
//! encodings by implementing these traits; the reference binding for raw
//! `Vec<u8>` pairs is provided here and used throughout the tests.

use std::hash::Hash;

use crate::error::StoreResult;

/// A domain key usable by the cache and the store adapters.
///
/// Ordering guarantees exposed to callers are derived from the byte
/// encoding returned by [`CacheKey::to_bytes`]: two keys compare the way
/// their encodings compare lexicographically.
pub trait CacheKey: Clone + Eq + Hash + Send + Sync + 'static {
    /// Encodes the key into the raw bytes stored by the backing store.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decodes a key from its raw byte encoding.
    ///
    /// Fails with [`crate::StoreError::Corrupted`] when the bytes cannot
    /// form a valid key.
    fn from_bytes(bytes: &[u8]) -> StoreResult<Self>;
}

/// A domain value usable by the cache and the store adapters.
pub trait CacheValue: Clone + Send + Sync + 'static {
    /// Encodes the value into the raw bytes stored by the backing store.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decodes a value from its raw byte encoding.
    fn from_bytes(bytes: &[u8]) -> StoreResult<Self>;

    /// Merges the state of `replica` into `self` in place.
    ///
    /// Used at the layered-cache boundary so that an update flows into the
    /// existing tracked value rather than replacing the entry wholesale.
    fn from_replica(&mut self, replica: &Self) {
        *self = replica.clone();
    }
}

impl CacheKey for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }

    fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        Ok(bytes.to_vec())
    }
}

impl CacheValue for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }

    fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        Ok(bytes.to_vec())
    }

    fn from_replica(&mut self, replica: &Self) {
        self.clone_from(replica);
    }
}
