// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// error.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Error types shared by the cache and store layers.

use thiserror::Error;

/// Errors raised by the transactional cache and its backing stores.
///
/// All of these are contract violations surfaced synchronously to the
/// caller; none are retried or swallowed internally. A host application
/// should treat them as fatal to the enclosing unit of work.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested key is absent from both the cache overlay and the
    /// backing source.
    #[error("key not found")]
    KeyNotFound,

    /// `add` hit a key that is already resident in a non-resurrectable
    /// state.
    #[error("key already exists in the cache")]
    DuplicateKey,

    /// A mutating operation was attempted on a cache built without a
    /// change set.
    #[error("cache is read-only")]
    ReadOnly,

    /// Backward find over an empty or all-`0xff` prefix has no
    /// well-defined upper bound.
    #[error("unsupported seek range")]
    UnsupportedRange,

    /// The backing source produced an entry this layer cannot decode.
    /// Indicates a broken adapter, not an expected runtime condition.
    #[error("corrupted entry: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Creates a [`StoreError::Corrupted`] from any printable message.
    pub fn corrupted(message: impl Into<String>) -> Self {
        StoreError::Corrupted(message.into())
    }
}

/// Result alias used across the crate.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
