// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sharded index: sorted boundary keys plus lazily supplied shards.

use alloc::string::String;
use alloc::vec::Vec;

use crate::location::Location;
use crate::shard::{Breadcrumbs, Shard};

/// Errors raised while building or filling a [`ShardIndex`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Boundary keys must be sorted ascending.
    #[error("boundary {position} sorts before its predecessor")]
    Unsorted {
        /// Position of the first out-of-order key.
        position: usize,
    },
    /// A shard number beyond the boundary list.
    #[error("shard {shard} is out of range (index has {len} shards)")]
    OutOfRange {
        /// Requested shard.
        shard: usize,
        /// Number of shards.
        len: usize,
    },
}

/// Which shard to consult for a location, after the "before first boundary" fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardChoice {
    /// Shard number.
    pub shard: usize,
    /// Location to look up; replaced by the root page when the key sorts
    /// before every boundary.
    pub location: Location,
}

/// Breadcrumb index split into shards addressed by sorted boundary keys.
///
/// Boundary `i` is the smallest key stored in shard `i`, so the shard covering
/// a key is the last one whose boundary is `<=` the key. Shards start out
/// missing and are filled with [`ShardIndex::insert_shard`] once fetched.
///
/// ```rust
/// use understory_nav_index::{Location, Shard, ShardIndex};
///
/// let mut index = ShardIndex::new(vec![".html".into(), "classA.html".into()]).unwrap();
/// let choice = index.choose(&Location::parse("index.html#intro"), "index.html");
/// assert_eq!(choice.shard, 1);
/// assert!(!index.is_loaded(1));
///
/// let mut shard = Shard::new();
/// shard.insert("index.html#intro", [0, 1]);
/// index.insert_shard(1, shard).unwrap();
/// let crumbs = index.lookup(1, &choice.location).unwrap();
/// assert_eq!(crumbs.as_slice(), &[0, 1]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShardIndex {
    boundaries: Vec<String>,
    shards: Vec<Option<Shard>>,
}

impl ShardIndex {
    /// Create an index from sorted boundary keys.
    pub fn new(boundaries: Vec<String>) -> Result<Self, IndexError> {
        if let Some(position) = boundaries.windows(2).position(|w| w[0] > w[1]) {
            return Err(IndexError::Unsorted {
                position: position + 1,
            });
        }
        let shards = boundaries.iter().map(|_| None).collect();
        Ok(Self { boundaries, shards })
    }

    /// Decode the boundary list from a JSON array of strings.
    #[cfg(feature = "serde")]
    pub fn boundaries_from_json(json: &str) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Boundary keys.
    pub fn boundaries(&self) -> &[String] {
        &self.boundaries
    }

    /// Number of shards.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns `true` if the index has no shards.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Shard covering `key`, or `None` when `key` sorts before every boundary.
    pub fn shard_for(&self, key: &str) -> Option<usize> {
        self.boundaries
            .partition_point(|b| b.as_str() <= key)
            .checked_sub(1)
    }

    /// Shard and effective location for `location`.
    ///
    /// Keys sorting before the first boundary fall back to shard 0 and
    /// `root_page`, keeping the fragment.
    pub fn choose(&self, location: &Location, root_page: &str) -> ShardChoice {
        match self.shard_for(&location.key()) {
            Some(shard) => ShardChoice {
                shard,
                location: location.clone(),
            },
            None => ShardChoice {
                shard: 0,
                location: Location {
                    page: root_page.into(),
                    fragment: location.fragment.clone(),
                },
            },
        }
    }

    /// Returns `true` once shard `i` has been supplied.
    pub fn is_loaded(&self, i: usize) -> bool {
        self.shards.get(i).is_some_and(Option::is_some)
    }

    /// Shard `i`, if loaded.
    pub fn shard(&self, i: usize) -> Option<&Shard> {
        self.shards.get(i).and_then(Option::as_ref)
    }

    /// Store a fetched shard. A shard that is already present is kept.
    pub fn insert_shard(&mut self, i: usize, shard: Shard) -> Result<(), IndexError> {
        let len = self.shards.len();
        let slot = self
            .shards
            .get_mut(i)
            .ok_or(IndexError::OutOfRange { shard: i, len })?;
        if slot.is_none() {
            *slot = Some(shard);
        }
        Ok(())
    }

    /// Breadcrumbs for `location` in shard `i`; `None` if the shard is not
    /// loaded or holds neither the exact key nor the page.
    pub fn lookup(&self, i: usize, location: &Location) -> Option<&Breadcrumbs> {
        self.shard(i)?.lookup(location)
    }
}
