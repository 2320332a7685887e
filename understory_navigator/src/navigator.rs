// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigator: one navigation panel's state machine.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use hashbrown::HashSet;
use understory_nav_index::{
    Breadcrumbs, Location, ShardIndex, base_name, is_line_anchor, link_class, resolve_link,
    strip_path, strip_path2,
};
use understory_nav_tree::{ChildrenData, Expansion, NavTree, NodeIcon, NodeId};

use crate::config::NavigatorConfig;
use crate::error::{LoadError, NavError};
use crate::host::{AnchorInfo, AnchorKind, Highlight, Host, RenderEvent};
use crate::resource::{NavData, Registry, Resource, ResourceId, subtree_identifier};
use crate::scroll::{ScrollAnimation, ScrollOutcome, ScrollTarget, center_offset, duration_for};
use crate::sync::LinkStore;

/// Work parked until a resource arrives.
#[derive(Clone, Debug)]
enum Continuation {
    /// A user expansion of `node`.
    Expand { node: NodeId },
    /// Walk the breadcrumbs from `node`, which sits at position `step`.
    Show {
        generation: u64,
        node: NodeId,
        step: usize,
        fragment: String,
    },
    /// Look `location` up in `shard`.
    Goto {
        generation: u64,
        shard: usize,
        location: Location,
    },
}

#[derive(Clone, Debug)]
struct DeferredScroll {
    anchor: String,
    update_location: bool,
}

/// State of one navigation panel.
///
/// The navigator never performs I/O. Operations that need a subtree or an
/// index shard queue a [`ResourceId`] and park the rest of the work; the host
/// drains the queue with [`take_requests`](Self::take_requests) and reports
/// each result with [`complete`](Self::complete), or lets
/// [`load_pending`](Self::load_pending) do both with a [`Loader`](crate::Loader).
///
/// Every navigation bumps a generation counter. Work parked by an older
/// navigation still delivers its data to the tree when it resumes, but no
/// longer moves the selection.
pub struct Navigator<H> {
    config: NavigatorConfig,
    host: H,
    tree: NavTree,
    index: ShardIndex,
    registry: Registry,
    root_page: String,
    breadcrumbs: Breadcrumbs,
    location: Option<Location>,
    links: LinkStore,
    generation: u64,
    animating: bool,
    on_finish: Option<String>,
    deferred: Option<DeferredScroll>,
    panel_pending: bool,
    requests: Vec<ResourceId>,
    /// Identifiers of resources requested and not yet completed.
    in_flight: HashSet<String>,
    waiting: Vec<(ResourceId, Continuation)>,
}

impl<H> fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("tree", &self.tree)
            .field("root_page", &self.root_page)
            .field("breadcrumbs", &self.breadcrumbs)
            .field("location", &self.location)
            .field("generation", &self.generation)
            .field("animating", &self.animating)
            .field("in_flight", &self.in_flight.len())
            .field("waiting", &self.waiting.len())
            .finish_non_exhaustive()
    }
}

impl<H: Host> Navigator<H> {
    /// Create a navigator over `data`.
    ///
    /// The tree root page is the link of the first top-level entry; without
    /// one the configured root page is used.
    pub fn new(config: NavigatorConfig, host: H, data: NavData) -> Result<Self, NavError> {
        let root_page = data
            .root_page()
            .map_or_else(|| config.root_page.clone(), String::from);
        let NavData { tree, boundaries } = data;
        let index = ShardIndex::new(boundaries)?;
        let links = LinkStore::load(&config, &host);
        let tree = NavTree::new(ChildrenData::Inline(tree));
        Ok(Self {
            config,
            host,
            tree,
            index,
            registry: Registry::new(),
            root_page,
            breadcrumbs: Breadcrumbs::new(),
            location: None,
            links,
            generation: 0,
            animating: false,
            on_finish: None,
            deferred: None,
            panel_pending: false,
            requests: Vec::new(),
            in_flight: HashSet::new(),
            waiting: Vec::new(),
        })
    }

    /// Show the sync indicator and resolve the page being viewed.
    ///
    /// With sync on, a persisted link replaces the page and its fragment.
    pub fn init(&mut self) {
        if self.links.supported() {
            self.host.render(RenderEvent::SyncIndicator {
                enabled: self.links.enabled(),
            });
        }
        let location = match self.links.cached_link(&self.host) {
            Some(link) => {
                tracing::debug!(%link, "restoring persisted link");
                Location::parse(&link)
            }
            None => Location::new(self.config.root_page.clone(), &self.host.fragment()),
        };
        self.navigate(location);
    }

    /// Resolve `location`: expand its breadcrumb path and select its entry.
    ///
    /// Supersedes any navigation still waiting for data.
    pub fn navigate(&mut self, location: Location) {
        self.generation += 1;
        self.nav_to(location);
    }

    /// React to a change of the URL fragment.
    pub fn on_hash_change(&mut self) {
        let raw = self.host.fragment();
        let fragment = raw.strip_prefix('#').unwrap_or(&raw);
        if is_line_anchor(fragment) {
            // Source lines have no tree entry; the selection stays put.
            self.highlight_line(fragment);
        } else if !fragment.is_empty() {
            let matched = self.matching_entry(fragment);
            if matched.is_none() || matched != self.tree.selected() {
                self.clear_selection();
            }
            let page = strip_path2(&self.host.pathname()).to_string();
            self.navigate(Location::new(page, fragment));
        } else if self.animating {
            tracing::trace!("empty fragment during an animation, ignored");
        } else {
            self.host.render(RenderEvent::ContentScrollReset);
            self.clear_selection();
            let root = Location::new(self.config.root_page.clone(), "");
            self.navigate(root);
        }
    }

    /// Expand `node`, fetching its children first if they are external.
    pub fn expand(&mut self, node: NodeId) -> Result<Expansion, NavError> {
        self.check(node)?;
        Ok(self.expand_or_request(node, true))
    }

    /// Collapse `node`. Returns `true` if it was expanded.
    pub fn collapse(&mut self, node: NodeId) -> Result<bool, NavError> {
        self.check(node)?;
        let collapsed = self.tree.collapse(node);
        if collapsed && let Some(icon) = self.tree.icon(node) {
            self.host.render(RenderEvent::NodeCollapsed { node, icon });
        }
        Ok(collapsed)
    }

    /// Collapse `node` if expanded, expand it otherwise.
    pub fn toggle(&mut self, node: NodeId) -> Result<(), NavError> {
        if self.tree.is_expanded(node) {
            self.collapse(node)?;
        } else {
            self.expand(node)?;
        }
        Ok(())
    }

    /// Activate the entry `node` as if its link was clicked.
    ///
    /// The link is persisted when sync is on. A link into the current page
    /// selects the entry and scrolls the content to the anchor, updating the
    /// fragment once the scroll ends; other links are handed to
    /// [`Host::navigate`]. Entries without a link toggle.
    pub fn follow_link(&mut self, node: NodeId) -> Result<(), NavError> {
        self.check(node)?;
        let Some(link) = self.tree.link(node).map(String::from) else {
            if !self.tree.is_leaf(node) {
                self.toggle(node)?;
            }
            return Ok(());
        };
        let resolved = resolve_link(&link, &self.config.relpath, &self.host.pathname());
        self.links.store(&mut self.host, &resolved.link);
        match resolved.anchor {
            Some(anchor) if resolved.same_page => {
                self.select(node);
                if let Some(info) = self.host.anchor(&anchor) {
                    self.goto_anchor(&anchor, info, true);
                }
            }
            _ => self.host.navigate(&resolved.url),
        }
        Ok(())
    }

    /// Switch link persistence on or off.
    ///
    /// Either direction clears the stored link. Setting the current state
    /// again does nothing.
    pub fn set_sync(&mut self, enabled: bool) {
        if self.links.set_enabled(&mut self.host, enabled) {
            tracing::debug!(enabled, "navigation sync toggled");
            if self.links.supported() {
                self.host.render(RenderEvent::SyncIndicator { enabled });
            }
        }
    }

    /// Flip link persistence. Returns the new state.
    pub fn toggle_sync(&mut self) -> bool {
        let enabled = !self.links.enabled();
        self.set_sync(enabled);
        enabled
    }

    /// Whether followed links are persisted.
    pub fn sync_enabled(&self) -> bool {
        self.links.enabled()
    }

    /// Centre the selected entry in the panel.
    ///
    /// When the host has no panel metrics yet the request stays pending and
    /// [`poll`](Self::poll) retries it.
    pub fn scroll_into_view(&mut self) -> ScrollOutcome {
        let Some(row) = self
            .tree
            .selected()
            .and_then(|selected| self.tree.visible_row(selected))
        else {
            self.panel_pending = false;
            return ScrollOutcome::Skipped;
        };
        let Some(panel) = self.host.panel() else {
            tracing::trace!(row, "panel not ready, scroll stays pending");
            self.panel_pending = true;
            return ScrollOutcome::Pending;
        };
        self.panel_pending = false;
        let to = center_offset(row, self.config.row_height, panel.viewport_height);
        self.host.render(RenderEvent::Scroll(ScrollAnimation {
            target: ScrollTarget::NavPanel,
            from: panel.scroll_offset,
            to,
            duration_ms: duration_for(to - panel.scroll_offset, &self.config.scroll),
        }));
        ScrollOutcome::Scheduled
    }

    /// Retry a pending panel scroll. Returns `None` when nothing was pending.
    pub fn poll(&mut self) -> Option<ScrollOutcome> {
        self.panel_pending.then(|| self.scroll_into_view())
    }

    /// The host finished the running content animation.
    ///
    /// Applies the fragment of a clicked in-page link and starts a deferred
    /// scroll, if any.
    pub fn finish_animation(&mut self) {
        if !self.animating {
            return;
        }
        self.animating = false;
        if let Some(fragment) = self.on_finish.take() {
            self.host.set_fragment(&fragment);
        }
        if let Some(next) = self.deferred.take()
            && let Some(info) = self.host.anchor(&next.anchor)
        {
            self.goto_anchor(&next.anchor, info, next.update_location);
        }
    }

    /// Drain the resources requested since the last call.
    pub fn take_requests(&mut self) -> Vec<ResourceId> {
        mem::take(&mut self.requests)
    }

    /// Report the outcome of loading `id` and resume everything waiting on it.
    ///
    /// Subtree data is handed to every node referencing it and kept for later
    /// references. A failure is logged and drops the waiting work; the next
    /// operation needing the resource requests it again.
    pub fn complete(&mut self, id: ResourceId, result: Result<Resource, LoadError>) {
        let key = id.identifier();
        if !self.in_flight.remove(&key) {
            tracing::debug!(%id, "completion for a resource that was not in flight");
        }
        let (ready, rest): (Vec<_>, Vec<_>) = mem::take(&mut self.waiting)
            .into_iter()
            .partition(|(waiting_on, _)| waiting_on.identifier() == key);
        self.waiting = rest;

        let resource = match result {
            Ok(resource) if resource.matches(&id) => resource,
            Ok(_) => {
                tracing::warn!(%id, "navigation resource has the wrong kind");
                return;
            }
            Err(err) => {
                tracing::warn!(%id, %err, "failed to load navigation resource");
                return;
            }
        };
        match resource {
            Resource::Shard(shard) => {
                let ResourceId::Shard(n) = id else {
                    return;
                };
                if let Err(err) = self.index.insert_shard(n, shard) {
                    tracing::warn!(%err, "discarding navigation index shard");
                    return;
                }
            }
            Resource::Subtree(entries) => {
                let targets: Vec<NodeId> = self
                    .tree
                    .iter()
                    .filter(|&n| {
                        self.tree
                            .children_data(n)
                            .and_then(ChildrenData::reference)
                            .is_some_and(|name| subtree_identifier(name) == key)
                    })
                    .collect();
                for node in targets {
                    self.tree.supply(node, entries.clone());
                }
                self.registry.insert(&id, Resource::Subtree(entries));
            }
        }
        for (_, continuation) in ready {
            self.resume(continuation);
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The navigation tree.
    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    /// The breadcrumb index.
    pub fn index(&self) -> &ShardIndex {
        &self.index
    }

    /// Subtrees loaded so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Page of the first top-level entry; unresolvable locations fall back to it.
    pub fn root_page(&self) -> &str {
        &self.root_page
    }

    /// Breadcrumbs of the last resolved location, leading `0` included.
    pub fn breadcrumbs(&self) -> &[usize] {
        &self.breadcrumbs
    }

    /// Location currently being resolved.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// The selected entry.
    pub fn selected(&self) -> Option<NodeId> {
        self.tree.selected()
    }

    /// Whether a content scroll animation is running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether any resource is still being loaded.
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    fn check(&self, node: NodeId) -> Result<(), NavError> {
        if self.tree.contains(node) {
            Ok(())
        } else {
            Err(NavError::UnknownNode(node))
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation {
            return true;
        }
        tracing::debug!(
            generation,
            current = self.generation,
            "dropping stale navigation step"
        );
        false
    }

    fn resume(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Expand { node } => {
                self.expand_or_request(node, true);
            }
            Continuation::Show {
                generation,
                node,
                step,
                fragment,
            } => {
                if self.is_current(generation) {
                    self.show_node(node, step, fragment);
                }
            }
            Continuation::Goto {
                generation,
                shard,
                location,
            } => {
                if self.is_current(generation) {
                    self.goto_node(shard, location);
                }
            }
        }
    }

    fn request(&mut self, id: ResourceId, continuation: Continuation) {
        self.waiting.push((id.clone(), continuation));
        if self.in_flight.insert(id.identifier()) {
            tracing::debug!(%id, "requesting navigation resource");
            self.requests.push(id);
        } else {
            tracing::trace!(%id, "already in flight");
        }
    }

    fn nav_to(&mut self, mut location: Location) {
        if location.is_line_anchor() {
            let line = mem::take(&mut location.fragment);
            self.highlight_line(&line);
            if self.tree.selected().is_some() {
                return;
            }
        }
        if self.index.is_empty() {
            tracing::warn!(%location, "navigation index has no shards");
            return;
        }
        let choice = self.index.choose(&location, &self.root_page);
        self.location = Some(choice.location.clone());
        if self.index.is_loaded(choice.shard) {
            self.goto_node(choice.shard, choice.location);
        } else {
            let continuation = Continuation::Goto {
                generation: self.generation,
                shard: choice.shard,
                location: choice.location,
            };
            self.request(ResourceId::Shard(choice.shard), continuation);
        }
    }

    fn goto_node(&mut self, shard: usize, location: Location) {
        let Some(crumbs) = self.index.lookup(shard, &location) else {
            if location.page != self.root_page {
                tracing::debug!(%location, "no breadcrumbs, falling back to the root page");
                self.clear_selection();
                let root = Location::new(self.root_page.clone(), "");
                self.nav_to(root);
            } else {
                tracing::debug!(%location, "root page has no breadcrumbs");
            }
            return;
        };
        let mut breadcrumbs = Breadcrumbs::new();
        breadcrumbs.push(0);
        breadcrumbs.extend_from_slice(crumbs);
        self.breadcrumbs = breadcrumbs;
        let root = self.tree.root();
        self.show_node(root, 0, location.fragment);
    }

    fn show_node(&mut self, mut node: NodeId, mut step: usize, fragment: String) {
        let target = loop {
            match self.tree.children_data(node) {
                Some(ChildrenData::Inline(_)) => {}
                Some(ChildrenData::Reference(name)) => {
                    let id = ResourceId::Subtree(name.clone());
                    if !self.supply_from_registry(node, &id) {
                        let continuation = Continuation::Show {
                            generation: self.generation,
                            node,
                            step,
                            fragment,
                        };
                        self.request(id, continuation);
                        return;
                    }
                }
                _ => {
                    self.select_and_highlight(&fragment, None);
                    return;
                }
            }
            self.expand_node(node, false);
            let next = self
                .breadcrumbs
                .get(step)
                .and_then(|&i| self.tree.child_at(node, i));
            let Some(child) = next else {
                tracing::warn!(
                    step,
                    breadcrumbs = ?self.breadcrumbs.as_slice(),
                    "breadcrumb points past the children of its node"
                );
                let reached = (node != self.tree.root()).then_some(node);
                self.select_and_highlight(&fragment, reached);
                return;
            };
            if step + 1 < self.breadcrumbs.len() {
                node = child;
                step += 1;
            } else {
                break child;
            }
        };

        if let Some(ChildrenData::Reference(name)) = self.tree.children_data(target) {
            let id = ResourceId::Subtree(name.clone());
            if !self.supply_from_registry(target, &id) {
                let continuation = Continuation::Show {
                    generation: self.generation,
                    node,
                    step,
                    fragment,
                };
                self.request(id, continuation);
                return;
            }
        }
        if self.auto_expands() {
            self.expand_node(target, false);
        }
        self.select_and_highlight(&fragment, Some(target));
    }

    fn auto_expands(&self) -> bool {
        let base = base_name(&self.config.root_page);
        self.config.auto_expand_roots.iter().any(|r| r == base)
    }

    fn supply_from_registry(&mut self, node: NodeId, id: &ResourceId) -> bool {
        match self.registry.get(id) {
            Some(Resource::Subtree(entries)) => self.tree.supply(node, entries.clone()),
            _ => false,
        }
    }

    fn expand_or_request(&mut self, node: NodeId, animate: bool) -> Expansion {
        let expansion = self.expand_node(node, animate);
        if let Expansion::NeedsData(name) = &expansion {
            self.request(
                ResourceId::Subtree(name.clone()),
                Continuation::Expand { node },
            );
        }
        expansion
    }

    fn expand_node(&mut self, node: NodeId, animate: bool) -> Expansion {
        if let Some(ChildrenData::Reference(name)) = self.tree.children_data(node) {
            let id = ResourceId::Subtree(name.clone());
            self.supply_from_registry(node, &id);
        }
        let expansion = self.tree.expand(node);
        if let Expansion::Expanded { materialized } = expansion {
            if materialized {
                self.announce_children(node);
            }
            if node != self.tree.root()
                && let Some(icon) = self.tree.icon(node)
            {
                self.host.render(RenderEvent::NodeExpanded {
                    node,
                    icon,
                    animate,
                });
            }
        }
        expansion
    }

    fn announce_children(&mut self, parent: NodeId) {
        let pathname = self.host.pathname();
        let children = self.tree.children_of(parent).to_vec();
        for node in children {
            let href = self
                .tree
                .link(node)
                .map(|link| resolve_link(link, &self.config.relpath, &pathname).url);
            let depth = self.tree.depth(node).unwrap_or(1);
            let event = RenderEvent::NodeCreated {
                node,
                parent,
                label: self.tree.label(node).unwrap_or_default().to_string(),
                href,
                indent: self.config.indent * f64::from(depth.saturating_sub(1)),
                icon: self.tree.icon(node).unwrap_or(NodeIcon::Leaf),
            };
            self.host.render(event);
        }
    }

    fn select(&mut self, node: NodeId) {
        if self.tree.selected() == Some(node) {
            return;
        }
        let previous = self.tree.select(node);
        let first_row = self.tree.visible_row(node) == Some(0);
        self.host.render(RenderEvent::Selected {
            node,
            previous,
            first_row,
        });
    }

    fn clear_selection(&mut self) {
        if self.tree.clear_selection().is_some() {
            self.host.render(RenderEvent::SelectionCleared);
        }
    }

    /// Entry whose link class ends with `<current page>:<fragment>`.
    fn matching_entry(&self, fragment: &str) -> Option<NodeId> {
        if fragment.is_empty() {
            return None;
        }
        let suffix = format!("{}:{}", strip_path(&self.host.pathname()), fragment);
        self.tree.find(|id| {
            self.tree
                .link(id)
                .is_some_and(|link| link_class(link).ends_with(&suffix))
        })
    }

    fn select_and_highlight(&mut self, fragment: &str, node: Option<NodeId>) {
        if let Some(entry) = self.matching_entry(fragment) {
            self.select(entry);
            self.highlight_anchor(fragment);
        } else if let Some(node) = node {
            self.select(node);
        }
        self.scroll_into_view();
    }

    fn highlight_anchor(&mut self, name: &str) {
        let Some(info) = self.host.anchor(name) else {
            tracing::debug!(anchor = name, "anchor not found, highlight skipped");
            return;
        };
        let duration_ms = match info.kind {
            AnchorKind::MemberDeclaration => self.config.highlight.declaration_ms,
            _ => self.config.highlight.default_ms,
        };
        self.glow(name, info, info.kind, duration_ms);
    }

    fn highlight_line(&mut self, name: &str) {
        let Some(info) = self.host.anchor(name) else {
            tracing::debug!(anchor = name, "line anchor not found");
            return;
        };
        let duration_ms = self.config.highlight.default_ms;
        self.glow(name, info, AnchorKind::LineNumber, duration_ms);
    }

    fn glow(&mut self, name: &str, info: AnchorInfo, kind: AnchorKind, duration_ms: u32) {
        self.host.render(RenderEvent::Highlight(Highlight {
            anchor: name.into(),
            kind,
            duration_ms,
        }));
        self.goto_anchor(name, info, false);
    }

    /// Scroll the content so the anchor sits at the top of the viewport.
    fn goto_anchor(&mut self, name: &str, info: AnchorInfo, update_location: bool) -> ScrollOutcome {
        if self.animating {
            self.deferred = Some(DeferredScroll {
                anchor: name.into(),
                update_location,
            });
            return ScrollOutcome::Deferred;
        }
        let Some(content) = self.host.content() else {
            return ScrollOutcome::Skipped;
        };
        let top = info.rect.y0;
        let max = content.max_scroll();
        let distance = top.min(max - content.scroll_offset);
        let animation = ScrollAnimation {
            target: ScrollTarget::Content,
            from: content.scroll_offset,
            to: (content.scroll_offset + top).clamp(0.0, max),
            duration_ms: duration_for(distance, &self.config.scroll),
        };
        self.animating = true;
        self.on_finish = update_location.then(|| String::from(name));
        self.host.render(RenderEvent::Scroll(animation));
        ScrollOutcome::Scheduled
    }
}
