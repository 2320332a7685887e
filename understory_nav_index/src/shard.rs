// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One lazily loaded piece of the breadcrumb index.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::location::Location;

/// Child indices from the top-level entry list down to one entry.
pub type Breadcrumbs = SmallVec<[usize; 8]>;

/// Map from `page` / `page#fragment` keys to breadcrumbs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shard {
    entries: HashMap<String, Breadcrumbs>,
}

impl Shard {
    /// Create an empty shard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the breadcrumbs for `key`.
    pub fn insert(&mut self, key: impl Into<String>, crumbs: impl IntoIterator<Item = usize>) {
        self.entries.insert(key.into(), crumbs.into_iter().collect());
    }

    /// Breadcrumbs stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Breadcrumbs> {
        self.entries.get(key)
    }

    /// Breadcrumbs for `location`: the exact `page#fragment` key first, then the page alone.
    pub fn lookup(&self, location: &Location) -> Option<&Breadcrumbs> {
        if location.has_fragment()
            && let Some(crumbs) = self.entries.get(location.key().as_str())
        {
            return Some(crumbs);
        }
        self.entries.get(location.page.as_str())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the shard has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a shard from a JSON object of `key: [indices]`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: alloc::collections::BTreeMap<String, Vec<usize>> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<usize>)> for Shard {
    fn from_iter<I: IntoIterator<Item = (K, Vec<usize>)>>(iter: I) -> Self {
        let mut shard = Self::new();
        for (key, crumbs) in iter {
            shard.insert(key, crumbs);
        }
        shard
    }
}
