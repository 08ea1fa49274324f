//! Memoized Gray-code parity columns for the diagonal synthesizer.
//!
//! Columns are keyed by `(gray, len)` and held as immutable slices, so a
//! single cache can be shared between compilers and threads. A `K`-wire
//! diagonal touches `2^K - K - 1` columns holding `Θ(4^K)` values in total;
//! columns longer than [`GrayCodeCache::max_len`] are built on demand and
//! never stored.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

type Table = RwLock<FxHashMap<(usize, usize), Arc<[f64]>>>;

/// Longest column memoized by [`GrayCodeCache::new`]: diagonals of up to
/// eleven wires, about 11 MiB when full.
pub const DEFAULT_MAX_LEN: usize = 1 << 10;

/// Binary-reflected Gray code of `i`.
#[inline]
pub fn gray(i: usize) -> usize {
    i ^ (i >> 1)
}

/// Cache of parity columns.
#[derive(Debug)]
pub struct GrayCodeCache {
    columns: Table,
    max_len: usize,
}

impl Default for GrayCodeCache {
    fn default() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }
}

impl GrayCodeCache {
    /// Create an empty cache bounded by [`DEFAULT_MAX_LEN`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that stores columns of at most `max_len` entries.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            columns: Table::default(),
            max_len,
        }
    }

    /// Longest column length that is memoized.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Parity column `v` of length `len` with `v[y] = (-1)^popcount(y & gray)`.
    pub fn column(&self, gray: usize, len: usize) -> Arc<[f64]> {
        let build = || {
            (0..len)
                .map(|y| if (y & gray).count_ones() % 2 == 0 { 1.0 } else { -1.0 })
                .collect()
        };
        if len > self.max_len {
            return build();
        }
        get_or_insert(&self.columns, (gray, len), build)
    }

    /// Number of memoized columns.
    pub fn len(&self) -> usize {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized column.
    pub fn clear(&self) {
        self.columns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn get_or_insert(
    table: &Table,
    key: (usize, usize),
    build: impl FnOnce() -> Arc<[f64]>,
) -> Arc<[f64]> {
    if let Some(hit) = table
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(hit);
    }
    // Built outside the write lock; a racing insert of the same key wins.
    let value = build();
    let mut guard = table.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(guard.entry(key).or_insert(value))
}
