// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_nav_tree --heading-base-level=0

//! Understory Nav Tree: a lazily materialized navigation tree.
//!
//! Generated documentation ships its table of contents as nested
//! `[label, link, children]` triples where `children` is either an inline list,
//! `null` for a leaf, or the name of another data file to fetch. This crate
//! mirrors that description as an interactive tree without creating nodes for
//! parts nobody opens.
//!
//! - [`EntryData`] / [`ChildrenData`]: the static descriptors.
//! - [`NavTree`]: arena of materialized nodes addressed by [`NodeId`].
//! - [`NavTree::expand`] materializes children on first use and reports
//!   [`Expansion::NeedsData`] when they live in an external resource; the
//!   caller fetches it and hands the entries over with [`NavTree::supply`].
//! - [`NavTree::collapse`] hides children but keeps them.
//! - [`NavTree::select`] keeps at most one node selected.
//! - [`NavTree::visible_row`] maps a node to its row in the rendered panel, for
//!   scrolling it into view.
//!
//! The tree does no I/O and knows nothing about rendering. Fetching and
//! drawing belong to the host, see `understory_navigator`.
//!
//! ## Features
//!
//! - `serde`: decode [`EntryData`] from the JSON triple form.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod entry;
mod tree;
mod types;

pub use entry::{ChildrenData, EntryData};
pub use tree::{NavTree, NodePath};
pub use types::{Expansion, NodeFlags, NodeIcon, NodeId};
