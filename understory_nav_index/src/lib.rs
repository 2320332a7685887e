// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_nav_index --heading-base-level=0

//! Understory Nav Index: the sharded breadcrumb index behind a documentation panel.
//!
//! Large documentation sets cannot ship the mapping from every page and anchor
//! to its position in the navigation tree as one file. Instead the mapping is
//! split into shards:
//!
//! - a sorted list of boundary keys says which shard covers a key
//!   ([`ShardIndex::shard_for`]);
//! - each [`Shard`] maps `page` and `page#fragment` keys to [`Breadcrumbs`],
//!   the child indices leading to the entry.
//!
//! Shards are supplied lazily with [`ShardIndex::insert_shard`]; this crate
//! never fetches anything itself.
//!
//! It also hosts the small string helpers the navigation data depends on:
//! [`Location`] keys, line-anchor detection ([`is_line_anchor`]), path
//! stripping ([`strip_path`], [`strip_path2`]), the per-entry [`link_class`]
//! and link resolution ([`resolve_link`]).
//!
//! ## Example
//!
//! ```rust
//! use understory_nav_index::{Location, Shard, ShardIndex};
//!
//! let mut index = ShardIndex::new(vec![".html".into()]).unwrap();
//! let mut shard = Shard::new();
//! shard.insert("index.html", [0]);
//! shard.insert("index.html#arr_secintro", [0, 1]);
//! index.insert_shard(0, shard).unwrap();
//!
//! // Unknown fragments fall back to the page entry.
//! let loc = Location::parse("index.html#unknown");
//! let choice = index.choose(&loc, "index.html");
//! assert_eq!(index.lookup(choice.shard, &choice.location).unwrap().as_slice(), &[0]);
//! ```
//!
//! ## Features
//!
//! - `serde`: decode shards ([`Shard::from_json`]) and boundary lists
//!   ([`ShardIndex::boundaries_from_json`]) from JSON.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod index;
mod location;
mod shard;

pub use index::{IndexError, ShardChoice, ShardIndex};
pub use location::{
    Location, ResolvedLink, base_name, is_line_anchor, link_class, resolve_link, strip_path,
    strip_path2,
};
pub use shard::{Breadcrumbs, Shard};
