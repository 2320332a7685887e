// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_navigator --heading-base-level=0

//! Understory Navigator: a headless, lazily loading documentation navigation panel.
//!
//! Generated API documentation often ships a side panel listing every page
//! and section. The data behind it is too large to load up front, so it is
//! split into:
//!
//! - a tree of entries whose deeper levels live in separate resources
//!   ([`understory_nav_tree`]);
//! - a sharded index mapping `page#fragment` keys to breadcrumbs, the child
//!   indices leading to the entry ([`understory_nav_index`]).
//!
//! A [`Navigator`] ties both to one page. Given the page and its fragment it
//! loads the index shard that covers it, walks the breadcrumbs expanding (and
//! if needed fetching) each node on the way, selects the entry, highlights the
//! anchor in the content and centres the entry in the panel.
//!
//! ## Sans-IO
//!
//! The navigator never fetches anything itself. Operations queue
//! [`ResourceId`]s; the host drains them with [`Navigator::take_requests`] and
//! answers with [`Navigator::complete`]. A resource is requested once while
//! in flight, however many operations wait on it. With a [`Loader`],
//! [`Navigator::load_pending`] runs that loop as a future.
//!
//! Everything visible goes through the [`Host`] trait: the navigator reports
//! [`RenderEvent`]s and asks for anchor positions and viewport metrics. Scroll
//! animations are descriptors ([`ScrollAnimation`]); the host runs them and
//! calls [`Navigator::finish_animation`] for content scrolls.
//!
//! ## Persistence
//!
//! With sync on, every followed link is stored and restored on the next page
//! load. Toggling sync clears the stored link.
//!
//! ## Example
//!
//! ```rust
//! use understory_navigator::{
//!     AnchorInfo, ContentMetrics, Host, NavData, Navigator, NavigatorConfig, PanelMetrics,
//!     RenderEvent, Resource, ResourceId,
//! };
//! use understory_nav_tree::EntryData;
//!
//! #[derive(Default)]
//! struct Page {
//!     events: Vec<RenderEvent>,
//! }
//!
//! impl Host for Page {
//!     fn pathname(&self) -> String { "/doc/index.html".into() }
//!     fn fragment(&self) -> String { "#intro".into() }
//!     fn set_fragment(&mut self, _: &str) {}
//!     fn navigate(&mut self, _: &str) {}
//!     fn storage_supported(&self) -> bool { false }
//!     fn storage_get(&self, _: &str) -> Option<String> { None }
//!     fn storage_set(&mut self, _: &str, _: &str) {}
//!     fn anchor(&self, _: &str) -> Option<AnchorInfo> { None }
//!     fn panel(&self) -> Option<PanelMetrics> {
//!         Some(PanelMetrics { viewport_height: 400.0, scroll_offset: 0.0 })
//!     }
//!     fn content(&self) -> Option<ContentMetrics> { None }
//!     fn render(&mut self, event: RenderEvent) { self.events.push(event); }
//! }
//!
//! let data = NavData {
//!     tree: vec![EntryData::branch(
//!         "Manual",
//!         Some("index.html"),
//!         vec![EntryData::leaf("Introduction", Some("index.html#intro"))],
//!     )],
//!     boundaries: vec!["index.html".into()],
//! };
//! let mut nav = Navigator::new(NavigatorConfig::default(), Page::default(), data).unwrap();
//! nav.init();
//!
//! // The covering shard is requested instead of fetched.
//! assert_eq!(nav.take_requests(), vec![ResourceId::Shard(0)]);
//! let shard = [("index.html", vec![0]), ("index.html#intro", vec![0])];
//! nav.complete(ResourceId::Shard(0), Ok(Resource::Shard(shard.into_iter().collect())));
//!
//! assert_eq!(nav.breadcrumbs(), &[0, 0]);
//! let selected = nav.selected().unwrap();
//! assert_eq!(nav.tree().label(selected), Some("Introduction"));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enable `std` in dependencies.
//! - `libm`: `no_std` maths for `kurbo`.
//! - `serde` (default): JSON decoding of navigation data
//!   ([`NavData::from_json`], [`Resource::from_json`]) and serde support for
//!   [`NavigatorConfig`].
//! - `toml`: [`NavigatorConfig::from_toml_str`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod driver;
mod error;
mod host;
mod navigator;
mod resource;
mod scroll;
mod sync;

pub use config::{HighlightConfig, NavigatorConfig, ScrollConfig};
#[cfg(feature = "toml")]
pub use error::ConfigError;
pub use error::{LoadError, NavError};
pub use host::{
    AnchorInfo, AnchorKind, ContentMetrics, Highlight, Host, PanelMetrics, RenderEvent,
};
pub use navigator::Navigator;
pub use resource::{LoadFuture, Loader, NavData, Registry, Resource, ResourceId, StaticLoader};
pub use scroll::{ScrollAnimation, ScrollOutcome, ScrollTarget, center_offset, duration_for};
