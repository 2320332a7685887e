// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Async driver feeding a [`Loader`] into a [`Navigator`].

use futures::future::join_all;

use crate::host::Host;
use crate::navigator::Navigator;
use crate::resource::Loader;

impl<H: Host> Navigator<H> {
    /// Load every requested resource with `loader` until no request remains.
    ///
    /// Requests issued together are awaited concurrently; completions may
    /// issue follow-up requests (a shard naming an external subtree, say),
    /// which are picked up by the next round. Returns the number of
    /// completions delivered. Failed loads are not retried.
    ///
    /// ```rust
    /// # use understory_navigator::*;
    /// # use understory_nav_tree::EntryData;
    /// # struct Page;
    /// # impl Host for Page {
    /// #     fn pathname(&self) -> String { "/doc/index.html".into() }
    /// #     fn fragment(&self) -> String { String::new() }
    /// #     fn set_fragment(&mut self, _: &str) {}
    /// #     fn navigate(&mut self, _: &str) {}
    /// #     fn storage_get(&self, _: &str) -> Option<String> { None }
    /// #     fn storage_set(&mut self, _: &str, _: &str) {}
    /// #     fn anchor(&self, _: &str) -> Option<AnchorInfo> { None }
    /// #     fn panel(&self) -> Option<PanelMetrics> { None }
    /// #     fn content(&self) -> Option<ContentMetrics> { None }
    /// #     fn render(&mut self, _: RenderEvent) {}
    /// # }
    /// let data = NavData {
    ///     tree: vec![EntryData::deferred("Manual", Some("index.html"), "manual")],
    ///     boundaries: vec!["index.html".into()],
    /// };
    /// let mut loader = StaticLoader::new();
    /// loader.register(
    ///     ResourceId::Subtree("manual".into()),
    ///     Resource::Subtree(vec![EntryData::leaf("Intro", Some("intro.html"))]),
    /// );
    /// loader.register(
    ///     ResourceId::Shard(0),
    ///     Resource::Shard([("index.html", vec![0])].into_iter().collect()),
    /// );
    ///
    /// let mut nav = Navigator::new(NavigatorConfig::default(), Page, data).unwrap();
    /// nav.init();
    /// let delivered = futures::executor::block_on(nav.load_pending(&loader));
    /// assert_eq!(delivered, 2);
    /// assert_eq!(nav.breadcrumbs(), &[0, 0]);
    /// assert_eq!(nav.tree().label(nav.selected().unwrap()), Some("Intro"));
    /// ```
    pub async fn load_pending<L: Loader + ?Sized>(&mut self, loader: &L) -> usize {
        let relpath = self.config().relpath.clone();
        let mut delivered = 0;
        loop {
            let ids = self.take_requests();
            if ids.is_empty() {
                return delivered;
            }
            tracing::trace!(count = ids.len(), "loading navigation resources");
            let results = join_all(ids.iter().map(|id| loader.load(id, &relpath))).await;
            for (id, result) in ids.into_iter().zip(results) {
                self.complete(id, result);
                delivered += 1;
            }
        }
    }
}
