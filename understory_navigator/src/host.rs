// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: what the navigator needs from the page it runs in, and the
//! render events it sends back.

use alloc::string::String;

use kurbo::Rect;
use understory_nav_tree::{NodeIcon, NodeId};

use crate::scroll::ScrollAnimation;

/// Environment of one navigation panel.
///
/// A browser host maps these to `location`, `localStorage` and the DOM; a
/// test host records the calls. Every method must return promptly.
pub trait Host {
    /// Path of the page currently shown, e.g. `/doc/Manual/index.html`.
    fn pathname(&self) -> String;

    /// Current URL fragment, with or without its leading `#`.
    fn fragment(&self) -> String;

    /// Replace the URL fragment without leaving the page.
    fn set_fragment(&mut self, fragment: &str);

    /// Load another page.
    fn navigate(&mut self, url: &str);

    /// Returns `false` when persistent storage is unavailable; all
    /// persistence is skipped then.
    fn storage_supported(&self) -> bool {
        true
    }

    /// Read a persisted value.
    fn storage_get(&self, key: &str) -> Option<String>;

    /// Persist a value.
    fn storage_set(&mut self, key: &str, value: &str);

    /// Position and kind of the anchor named `name` in the content area.
    fn anchor(&self, name: &str) -> Option<AnchorInfo>;

    /// Navigation panel metrics, `None` while the panel is not laid out yet.
    fn panel(&self) -> Option<PanelMetrics>;

    /// Content area metrics.
    fn content(&self) -> Option<ContentMetrics>;

    /// Apply a visual change.
    fn render(&mut self, event: RenderEvent);
}

/// What kind of element an anchor names; decides the highlight target and duration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Row of a member declaration table without detailed documentation.
    MemberDeclaration,
    /// Value of a documented enumeration.
    EnumValue,
    /// Field of a documented struct.
    StructField,
    /// Section heading.
    SectionHeader,
    /// Documented member.
    Member,
    /// Line of a source listing.
    LineNumber,
}

/// A resolved anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorInfo {
    /// Bounds of the highlight target. `y0` is relative to the top of the
    /// content viewport.
    pub rect: Rect,
    /// Anchor kind.
    pub kind: AnchorKind,
}

/// Navigation panel metrics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelMetrics {
    /// Visible height.
    pub viewport_height: f64,
    /// Current scroll offset.
    pub scroll_offset: f64,
}

/// Content area metrics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContentMetrics {
    /// Current scroll offset.
    pub scroll_offset: f64,
    /// Visible height.
    pub viewport_height: f64,
    /// Full scrollable height.
    pub content_height: f64,
}

impl ContentMetrics {
    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

/// A transient glow on part of the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    /// Anchor name.
    pub anchor: String,
    /// What is highlighted.
    pub kind: AnchorKind,
    /// How long the glow lasts; the host reverts it afterwards.
    pub duration_ms: u32,
}

/// Visual changes requested from the host.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    /// A panel row was created (hidden until its parent expands).
    NodeCreated {
        /// New node.
        node: NodeId,
        /// Its parent; the root container for top-level entries.
        parent: NodeId,
        /// Display text.
        label: String,
        /// Resolved URL, `None` for entries without a link.
        href: Option<String>,
        /// Left indentation of the row.
        indent: f64,
        /// Initial expansion affordance.
        icon: NodeIcon,
    },
    /// A row's children became visible.
    NodeExpanded {
        /// Expanded node.
        node: NodeId,
        /// New affordance.
        icon: NodeIcon,
        /// `true` for user-initiated expansion, which slides open.
        animate: bool,
    },
    /// A row's children were hidden.
    NodeCollapsed {
        /// Collapsed node.
        node: NodeId,
        /// New affordance.
        icon: NodeIcon,
    },
    /// The selection moved.
    Selected {
        /// Newly selected node.
        node: NodeId,
        /// Node that lost the selection.
        previous: Option<NodeId>,
        /// The selection is the first row of the panel.
        first_row: bool,
    },
    /// Nothing is selected any more.
    SelectionCleared,
    /// Glow part of the content.
    Highlight(Highlight),
    /// Start a scroll animation.
    Scroll(ScrollAnimation),
    /// Jump the content area back to the top.
    ContentScrollReset,
    /// Show the sync toggle in its on or off state.
    SyncIndicator {
        /// Sync state.
        enabled: bool,
    },
}
