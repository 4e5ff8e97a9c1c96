// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// seek.rs file belongs to the ledger-persistence project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Lazy iterators over the merged view of a cache and its backing source.
//!
//! The overlay projection is snapshotted and sorted up front (under the
//! cache lock); the backing stream stays lazy. Keys the overlay has touched
//! in any state shadow the backing stream, so a two-pointer merge never
//! sees the same key from both sides.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::codec::CacheKey;
use crate::error::StoreResult;
use crate::seek_direction::SeekDirection;

/// Computes the shortest byte string strictly greater than every key that
/// starts with `prefix`. `None` when no such bound exists (empty or
/// all-`0xff` prefixes).
pub(crate) fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    for i in (0..prefix.len()).rev() {
        if prefix[i] < 0xff {
            let mut bound = prefix[..=i].to_vec();
            bound[i] += 1;
            return Some(bound);
        }
    }
    None
}

/// Ordered, duplicate-free merge of the overlay projection and the backing
/// stream, produced by [`crate::DataCache::seek`].
pub struct SeekIter<'a, K, V> {
    cached: std::vec::IntoIter<(Vec<u8>, K, V)>,
    cached_head: Option<(Vec<u8>, K, V)>,
    uncached: Box<dyn Iterator<Item = StoreResult<(K, V)>> + 'a>,
    uncached_head: Option<(Vec<u8>, K, V)>,
    cached_keys: HashSet<K>,
    direction: SeekDirection,
    failed: bool,
}

impl<'a, K: CacheKey, V> SeekIter<'a, K, V> {
    pub(crate) fn new(
        cached: Vec<(Vec<u8>, K, V)>,
        cached_keys: HashSet<K>,
        uncached: Box<dyn Iterator<Item = StoreResult<(K, V)>> + 'a>,
        direction: SeekDirection,
    ) -> Self {
        Self {
            cached: cached.into_iter(),
            cached_head: None,
            uncached,
            uncached_head: None,
            cached_keys,
            direction,
            failed: false,
        }
    }

    /// Pulls the next backing entry that the overlay does not shadow.
    fn fill_uncached_head(&mut self) -> StoreResult<()> {
        while self.uncached_head.is_none() {
            match self.uncached.next() {
                None => break,
                Some(Err(error)) => return Err(error),
                Some(Ok((key, value))) => {
                    if self.cached_keys.contains(&key) {
                        continue;
                    }
                    let bytes = key.to_bytes();
                    self.uncached_head = Some((bytes, key, value));
                }
            }
        }
        Ok(())
    }
}

impl<'a, K: CacheKey, V> Iterator for SeekIter<'a, K, V> {
    type Item = StoreResult<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Err(error) = self.fill_uncached_head() {
            self.failed = true;
            return Some(Err(error));
        }
        if self.cached_head.is_none() {
            self.cached_head = self.cached.next();
        }

        let take_cached = match (&self.cached_head, &self.uncached_head) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(cached), Some(uncached)) => {
                // Ties are impossible: the backing stream was filtered
                // against the full overlay key set.
                self.direction.compare(&cached.0, &uncached.0) == Ordering::Less
            }
        };
        let head = if take_cached {
            self.cached_head.take()
        } else {
            self.uncached_head.take()
        };
        head.map(|(_, key, value)| Ok((key, value)))
    }
}

/// Prefix-filtered view over a [`SeekIter`], produced by
/// [`crate::DataCache::find`].
pub struct FindIter<'a, K, V> {
    seek: SeekIter<'a, K, V>,
    prefix: Vec<u8>,
    seek_bound: Vec<u8>,
    direction: SeekDirection,
    done: bool,
}

impl<'a, K: CacheKey, V> FindIter<'a, K, V> {
    pub(crate) fn new(
        seek: SeekIter<'a, K, V>,
        prefix: Vec<u8>,
        seek_bound: Vec<u8>,
        direction: SeekDirection,
    ) -> Self {
        Self {
            seek,
            prefix,
            seek_bound,
            direction,
            done: false,
        }
    }
}

impl<'a, K: CacheKey, V> Iterator for FindIter<'a, K, V> {
    type Item = StoreResult<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (key, value) = match self.seek.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error));
                }
                Some(Ok(entry)) => entry,
            };
            let bytes = key.to_bytes();
            if bytes.starts_with(&self.prefix) {
                return Some(Ok((key, value)));
            }
            // A backward scan starts at the synthetic successor bound,
            // which itself never matches the prefix; skip it and keep
            // going. Any other mismatch means the prefix run is over.
            if self.direction == SeekDirection::Forward || bytes != self.seek_bound {
                self.done = true;
                return None;
            }
        }
    }
}

/// Half-open `[start, end)` view over a [`SeekIter`], produced by
/// [`crate::DataCache::find_range`].
pub struct RangeIter<'a, K, V> {
    seek: SeekIter<'a, K, V>,
    end: Vec<u8>,
    direction: SeekDirection,
    done: bool,
}

impl<'a, K: CacheKey, V> RangeIter<'a, K, V> {
    pub(crate) fn new(seek: SeekIter<'a, K, V>, end: Vec<u8>, direction: SeekDirection) -> Self {
        Self {
            seek,
            end,
            direction,
            done: false,
        }
    }
}

impl<'a, K: CacheKey, V> Iterator for RangeIter<'a, K, V> {
    type Item = StoreResult<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.seek.next() {
            None => {
                self.done = true;
                None
            }
            Some(Err(error)) => {
                self.done = true;
                Some(Err(error))
            }
            Some(Ok((key, value))) => {
                if self.direction.compare(&key.to_bytes(), &self.end) == Ordering::Less {
                    Some(Ok((key, value)))
                } else {
                    self.done = true;
                    None
                }
            }
        }
    }
}
