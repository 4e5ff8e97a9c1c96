// Copyright (C) 2021-2026 The Ledger Persistence Project.
//
// seek_direction.rs file belongs to the ledger-persistence project and is
// free software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::cmp::Ordering;

/// Direction for seeking over ordered keys.
///
/// Keys compare by byte-lexicographic order: `Forward` is ascending,
/// `Backward` is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeekDirection {
    /// Seek forward (ascending order).
    #[default]
    Forward,
    /// Seek backward (descending order).
    Backward,
}

impl SeekDirection {
    /// Compares two raw keys in this direction's order.
    ///
    /// `Ordering::Less` means `a` is emitted before `b` when iterating in
    /// this direction.
    pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            SeekDirection::Forward => a.cmp(b),
            SeekDirection::Backward => b.cmp(a),
        }
    }
}
