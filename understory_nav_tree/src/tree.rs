// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: lazy materialization, expansion, selection, queries.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use smallvec::SmallVec;

use crate::entry::{ChildrenData, EntryData};
use crate::types::{Expansion, NodeFlags, NodeIcon, NodeId};

/// Child-index path from the root container to a node.
pub type NodePath = SmallVec<[usize; 8]>;

/// Navigation tree mirrored lazily from static entry descriptors.
///
/// The tree starts with a single root container (depth 0, no label) whose
/// descriptor is the top-level entry list. Child nodes are created the first
/// time their parent expands and are kept when it collapses, so an external
/// resource is never needed twice for the same node.
///
/// ## Example
///
/// ```rust
/// use understory_nav_tree::{ChildrenData, EntryData, Expansion, NavTree};
///
/// let mut tree = NavTree::new(
///     ChildrenData::Inline(vec![EntryData::branch(
///         "Manual",
///         Some("index.html"),
///         vec![
///             EntryData::leaf("Intro", Some("intro.html")),
///             EntryData::deferred("Classes", Some("annotated.html"), "annotated"),
///         ],
///     )]),
/// );
///
/// let root = tree.root();
/// assert_eq!(tree.expand(root), Expansion::Expanded { materialized: true });
/// let manual = tree.child_at(root, 0).unwrap();
/// tree.expand(manual);
///
/// // Deferred children must be supplied before the node can open.
/// let classes = tree.child_at(manual, 1).unwrap();
/// assert_eq!(tree.expand(classes), Expansion::NeedsData("annotated".into()));
/// tree.supply(classes, vec![EntryData::leaf("Point_2", Some("classPoint__2.html"))]);
/// assert_eq!(tree.expand(classes), Expansion::Expanded { materialized: true });
/// assert_eq!(tree.depth(tree.child_at(classes, 0).unwrap()), Some(3));
/// ```
#[derive(Clone)]
pub struct NavTree {
    nodes: Vec<Node>,
    selected: Option<NodeId>,
}

impl core::fmt::Debug for NavTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let expanded = self
            .nodes
            .iter()
            .filter(|n| n.flags.contains(NodeFlags::EXPANDED))
            .count();
        f.debug_struct("NavTree")
            .field("nodes", &self.nodes.len())
            .field("expanded", &expanded)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    label: String,
    link: Option<String>,
    data: ChildrenData,
    depth: u32,
    flags: NodeFlags,
}

impl NavTree {
    /// Create a tree whose root container holds `top` as its descriptor.
    pub fn new(top: ChildrenData) -> Self {
        Self {
            nodes: alloc::vec![Node {
                parent: None,
                children: Vec::new(),
                label: String::new(),
                link: None,
                data: top,
                depth: 0,
                flags: NodeFlags::LAST,
            }],
            selected: None,
        }
    }

    /// The root container.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of materialized nodes, root container included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root container exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` refers to a node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.idx())
    }

    /// Display text of `id`.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    /// Raw link of `id`, as written in the navigation data.
    pub fn link(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.link.as_deref())
    }

    /// Children descriptor of `id`.
    pub fn children_data(&self, id: NodeId) -> Option<&ChildrenData> {
        self.node(id).map(|n| &n.data)
    }

    /// Depth of `id`; the root container is 0.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.node(id).map(|n| n.depth)
    }

    /// Parent of `id`, `None` for the root container.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Materialized children of `id` in display order.
    ///
    /// Empty until `id` has been expanded once.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Materialized child `index` of `id`.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children_of(id).get(index).copied()
    }

    /// State bits of `id`.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node(id).map(|n| n.flags)
    }

    /// Returns `true` if `id` is currently expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(NodeFlags::EXPANDED))
    }

    /// Returns `true` if `id` can never expand.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.data.is_leaf())
    }

    /// Icon state for `id`.
    pub fn icon(&self, id: NodeId) -> Option<NodeIcon> {
        let n = self.node(id)?;
        Some(if n.data.is_leaf() {
            NodeIcon::Leaf
        } else if !n.flags.contains(NodeFlags::EXPANDED) {
            NodeIcon::Collapsed
        } else if n.flags.contains(NodeFlags::LAST) {
            NodeIcon::ExpandedLast
        } else {
            NodeIcon::Expanded
        })
    }

    /// Expand `id`, materializing its children the first time.
    ///
    /// See [`Expansion`] for the possible outcomes. Expanding twice is a no-op,
    /// and a node whose children are still a reference reports
    /// [`Expansion::NeedsData`] without changing state.
    pub fn expand(&mut self, id: NodeId) -> Expansion {
        let Some(n) = self.node(id) else {
            return Expansion::Leaf;
        };
        match &n.data {
            ChildrenData::Leaf => return Expansion::Leaf,
            ChildrenData::Reference(name) => return Expansion::NeedsData(name.clone()),
            ChildrenData::Inline(_) => {}
        }
        if n.flags.contains(NodeFlags::EXPANDED) {
            return Expansion::AlreadyExpanded;
        }
        let materialized = self.materialize(id);
        if let Some(n) = self.node_mut(id) {
            n.flags.insert(NodeFlags::EXPANDED);
        }
        Expansion::Expanded { materialized }
    }

    /// Collapse `id`. Children are kept.
    ///
    /// Returns `true` if the node was expanded.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        match self.node_mut(id) {
            Some(n) if n.flags.contains(NodeFlags::EXPANDED) => {
                n.flags.remove(NodeFlags::EXPANDED);
                true
            }
            _ => false,
        }
    }

    /// Replace a [`ChildrenData::Reference`] descriptor with loaded entries.
    ///
    /// Returns `false` (and drops `entries`) if the node's children were not a
    /// pending reference, so late or duplicate deliveries cannot overwrite data.
    pub fn supply(&mut self, id: NodeId, entries: Vec<EntryData>) -> bool {
        match self.node_mut(id) {
            Some(n) if matches!(n.data, ChildrenData::Reference(_)) => {
                n.data = ChildrenData::Inline(entries);
                true
            }
            _ => false,
        }
    }

    fn materialize(&mut self, id: NodeId) -> bool {
        let (entries, depth) = {
            let Some(n) = self.node_mut(id) else {
                return false;
            };
            if n.flags.contains(NodeFlags::VISITED) {
                return false;
            }
            n.flags.insert(NodeFlags::VISITED);
            let ChildrenData::Inline(list) = &n.data else {
                return false;
            };
            (list.clone(), n.depth)
        };
        let last = entries.len().saturating_sub(1);
        let mut ids = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            let child = NodeId::new(self.nodes.len());
            let mut flags = NodeFlags::empty();
            if i == last {
                flags.insert(NodeFlags::LAST);
            }
            self.nodes.push(Node {
                parent: Some(id),
                children: Vec::new(),
                label: entry.label,
                link: entry.link,
                data: entry.children,
                depth: depth + 1,
                flags,
            });
            ids.push(child);
        }
        tracing::trace!(node = id.0, count = ids.len(), "materialized children");
        if let Some(n) = self.node_mut(id) {
            n.children = ids;
        }
        true
    }

    /// Mark `id` as the only selected node. Returns the previous selection.
    pub fn select(&mut self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return self.selected;
        }
        let previous = self.clear_selection();
        if let Some(n) = self.node_mut(id) {
            n.flags.insert(NodeFlags::SELECTED);
        }
        self.selected = Some(id);
        previous
    }

    /// Clear the selection. Returns the node that was selected.
    pub fn clear_selection(&mut self) -> Option<NodeId> {
        let previous = mem::take(&mut self.selected);
        if let Some(p) = previous
            && let Some(n) = self.node_mut(p)
        {
            n.flags.remove(NodeFlags::SELECTED);
        }
        previous
    }

    /// The selected node, if any.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Child-index path from the root container to `id`.
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut path = NodePath::new();
        let mut cur = id;
        while let Some(parent) = self.parent_of(cur) {
            let pos = self.children_of(parent).iter().position(|&c| c == cur)?;
            path.push(pos);
            cur = parent;
        }
        if !self.contains(cur) {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// Follow a child-index path from the root container through materialized nodes.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root(), |cur, &i| self.child_at(cur, i))
    }

    /// Returns `true` if every ancestor of `id` (excluding the root container) is expanded.
    pub fn is_shown(&self, id: NodeId) -> bool {
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            if p != self.root() && !self.is_expanded(p) {
                return false;
            }
            cur = self.parent_of(p);
        }
        self.contains(id)
    }

    /// Row index of `id` among the entries currently shown in the panel.
    ///
    /// Rows are counted depth-first, descending only into expanded nodes. The
    /// root container itself is not a row. Returns `None` for the root
    /// container and for nodes hidden under a collapsed ancestor.
    pub fn visible_row(&self, id: NodeId) -> Option<usize> {
        if id == self.root() || !self.is_shown(id) {
            return None;
        }
        let mut row = 0;
        let mut stack: Vec<NodeId> = self.children_of(self.root()).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            if cur == id {
                return Some(row);
            }
            row += 1;
            if self.is_expanded(cur) {
                stack.extend(self.children_of(cur).iter().rev().copied());
            }
        }
        None
    }

    /// Number of rows currently shown in the panel.
    pub fn visible_rows(&self) -> usize {
        let mut rows = 0;
        let mut stack: Vec<NodeId> = self.children_of(self.root()).to_vec();
        while let Some(cur) = stack.pop() {
            rows += 1;
            if self.is_expanded(cur) {
                stack.extend_from_slice(self.children_of(cur));
            }
        }
        rows
    }

    /// First materialized node (in creation order) satisfying `pred`.
    pub fn find(&self, mut pred: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        (0..self.nodes.len()).map(NodeId::new).find(|&id| pred(id))
    }

    /// Iterate over every materialized node, root container first.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }
}
