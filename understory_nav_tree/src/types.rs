// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the navigation tree: node identifiers, flags, and icon states.

/// Identifier for a node in a [`NavTree`](crate::NavTree).
///
/// Nodes are never removed from a tree during its lifetime, so a plain slot
/// index is enough; ids from one tree are meaningless in another.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Raw slot index, handy for host-side maps from node to widget.
    pub const fn index(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Children are shown.
        const EXPANDED = 0b0000_0001;
        /// Children have been materialized (they stay when the node collapses).
        const VISITED  = 0b0000_0010;
        /// Node is the current selection.
        const SELECTED = 0b0000_0100;
        /// Node is the last child of its parent.
        const LAST     = 0b0000_1000;
    }
}

/// Expansion affordance shown in front of an entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeIcon {
    /// Leaf entry, no affordance.
    Leaf,
    /// Collapsed entry with children (a "plus" marker).
    Collapsed,
    /// Expanded entry (a "minus" marker).
    Expanded,
    /// Expanded entry that is also the last of its siblings.
    ExpandedLast,
}

impl NodeIcon {
    /// Image file name used by the classic documentation theme.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Leaf => "ftv2node.png",
            Self::Collapsed => "ftv2pnode.png",
            Self::Expanded => "ftv2mnode.png",
            Self::ExpandedLast => "ftv2mlastnode.png",
        }
    }
}

/// Result of asking a node to expand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// The node has no children descriptor and never expands.
    Leaf,
    /// The node was already expanded; nothing changed.
    AlreadyExpanded,
    /// The node is now expanded.
    Expanded {
        /// `true` when this call created the child nodes.
        materialized: bool,
    },
    /// The children live in an external resource that must be supplied
    /// with [`NavTree::supply`](crate::NavTree::supply) first.
    NeedsData(alloc::string::String),
}
