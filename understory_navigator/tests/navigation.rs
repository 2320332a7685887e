// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end navigation against a recording host.

#![cfg(feature = "serde")]

use std::collections::HashMap;

use futures::executor::block_on;
use kurbo::Rect;
use understory_nav_index::Location;
use understory_nav_tree::{EntryData, Expansion, NodeIcon, NodeId};
use understory_navigator::{
    AnchorInfo, AnchorKind, ContentMetrics, Host, NavData, NavError, Navigator, NavigatorConfig,
    PanelMetrics, RenderEvent, Resource, ResourceId, ScrollOutcome, ScrollTarget, StaticLoader,
};

const NAVTREE: &str = r#"[["Manual", "index.html", [
    ["Arrangements", "arrangements.html", "arr_intro"],
    ["Packages", "packages.html", [
        ["Kernel", "packages.html#PartKernels", null],
        ["Polygons", "packages.html#PartPolygons", null]
    ]],
    ["Classes", "annotated.html", "annotated"],
    ["Modules", null, [
        ["Geometry", "group__Geometry.html", null],
        ["All classes", "classes.html", "annotated"]
    ]]
]]]"#;

const BOUNDARIES: &str = r#"["annotated.html", "index.html"]"#;

const SHARD0: &str = r#"{
    "annotated.html": [2],
    "arrangements.html": [0],
    "broken.html": [1, 7],
    "classPoint__2.html": [2, 0],
    "classSegment__2.html": [2, 1],
    "group__Geometry.html": [3, 0]
}"#;

const SHARD1: &str = r#"{
    "index.html": [],
    "index.html#arr_secintro": [0, 1],
    "index.html#arr_secoverview": [0, 0],
    "packages.html": [1],
    "packages.html#PartKernels": [1, 0],
    "packages.html#PartPolygons": [1, 1]
}"#;

const ARR_INTRO: &str = r#"[
    ["Overview", "index.html#arr_secoverview", null],
    ["Introduction", "index.html#arr_secintro", null]
]"#;

const ANNOTATED: &str = r#"[
    ["Point_2", "classPoint__2.html", null],
    ["Segment_2", "classSegment__2.html", null]
]"#;

#[derive(Debug, Default)]
struct MockHost {
    pathname: String,
    fragment: String,
    no_storage: bool,
    storage: HashMap<String, String>,
    anchors: HashMap<String, AnchorInfo>,
    panel: Option<PanelMetrics>,
    content: Option<ContentMetrics>,
    events: Vec<RenderEvent>,
    navigated: Vec<String>,
    fragments: Vec<String>,
}

impl MockHost {
    fn at(page: &str, fragment: &str) -> Self {
        Self {
            pathname: format!("/doc/{page}"),
            fragment: fragment.into(),
            panel: Some(PanelMetrics {
                viewport_height: 400.0,
                scroll_offset: 0.0,
            }),
            content: Some(ContentMetrics {
                scroll_offset: 0.0,
                viewport_height: 600.0,
                content_height: 5000.0,
            }),
            ..Self::default()
        }
    }

    fn with_anchor(mut self, name: &str, top: f64, kind: AnchorKind) -> Self {
        self.anchors.insert(
            name.into(),
            AnchorInfo {
                rect: Rect::new(0.0, top, 640.0, top + 20.0),
                kind,
            },
        );
        self
    }
}

impl Host for MockHost {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.into());
        self.fragment = format!("#{fragment}");
    }

    fn navigate(&mut self, url: &str) {
        self.navigated.push(url.into());
    }

    fn storage_supported(&self) -> bool {
        !self.no_storage
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn storage_set(&mut self, key: &str, value: &str) {
        self.storage.insert(key.into(), value.into());
    }

    fn anchor(&self, name: &str) -> Option<AnchorInfo> {
        self.anchors.get(name).copied()
    }

    fn panel(&self) -> Option<PanelMetrics> {
        self.panel
    }

    fn content(&self) -> Option<ContentMetrics> {
        self.content
    }

    fn render(&mut self, event: RenderEvent) {
        self.events.push(event);
    }
}

fn loader() -> StaticLoader {
    let mut loader = StaticLoader::new();
    loader
        .register_json(ResourceId::Shard(0), SHARD0)
        .unwrap()
        .register_json(ResourceId::Shard(1), SHARD1)
        .unwrap()
        .register_json(ResourceId::Subtree("arr_intro".into()), ARR_INTRO)
        .unwrap()
        .register_json(ResourceId::Subtree("annotated".into()), ANNOTATED)
        .unwrap();
    loader
}

fn navigator(host: MockHost) -> Navigator<MockHost> {
    let data = NavData::from_json(NAVTREE, BOUNDARIES).unwrap();
    Navigator::new(NavigatorConfig::default(), host, data).unwrap()
}

fn started(host: MockHost) -> Navigator<MockHost> {
    let mut nav = navigator(host);
    nav.init();
    block_on(nav.load_pending(&loader()));
    nav
}

fn go(nav: &mut Navigator<MockHost>, link: &str) {
    nav.navigate(Location::parse(link));
    block_on(nav.load_pending(&loader()));
}

fn node(nav: &Navigator<MockHost>, label: &str) -> NodeId {
    let tree = nav.tree();
    tree.find(|id| tree.label(id) == Some(label))
        .unwrap_or_else(|| panic!("no materialized entry labelled {label}"))
}

fn selected_label(nav: &Navigator<MockHost>) -> Option<&str> {
    nav.selected().and_then(|id| nav.tree().label(id))
}

fn scrolls(nav: &Navigator<MockHost>, target: ScrollTarget) -> Vec<(f64, f64, u32)> {
    nav.host()
        .events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::Scroll(a) if a.target == target => Some((a.from, a.to, a.duration_ms)),
            _ => None,
        })
        .collect()
}

#[test]
fn resolves_section_anchor_on_the_index_page() {
    let host =
        MockHost::at("index.html", "#arr_secintro").with_anchor("arr_secintro", 300.0, AnchorKind::SectionHeader);
    let nav = started(host);

    assert_eq!(nav.breadcrumbs(), &[0, 0, 1]);
    assert_eq!(selected_label(&nav), Some("Introduction"));
    let tree = nav.tree();
    assert!(tree.is_expanded(node(&nav, "Manual")));
    assert!(tree.is_expanded(node(&nav, "Arrangements")));
    assert!(!tree.is_expanded(node(&nav, "Packages")));
    assert!(!tree.is_expanded(node(&nav, "Classes")));
    assert_eq!(
        tree.path_of(nav.selected().unwrap()).unwrap().as_slice(),
        nav.breadcrumbs()
    );

    assert_eq!(scrolls(&nav, ScrollTarget::NavPanel).len(), 1, "panel scrolled once");
    assert_eq!(scrolls(&nav, ScrollTarget::Content), vec![(0.0, 300.0, 300)]);
    assert!(nav.host().events.iter().any(|e| matches!(
        e,
        RenderEvent::Highlight(h) if h.anchor == "arr_secintro"
            && h.kind == AnchorKind::SectionHeader
            && h.duration_ms == 1000
    )));
    assert!(nav.is_animating());
}

#[test]
fn rows_are_announced_with_indent_and_icon() {
    let nav = started(MockHost::at("index.html", ""));
    let created: Vec<_> = nav
        .host()
        .events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::NodeCreated {
                label,
                href,
                indent,
                icon,
                ..
            } => Some((label.as_str(), href.clone(), *indent, *icon)),
            _ => None,
        })
        .collect();
    assert_eq!(created[0], ("Manual", Some("index.html".into()), 0.0, NodeIcon::Collapsed));
    assert!(created.contains(&("Modules", None, 16.0, NodeIcon::Collapsed)));
    assert!(created.contains(&("Arrangements", Some("arrangements.html".into()), 16.0, NodeIcon::Collapsed)));
    assert_eq!(selected_label(&nav), Some("Manual"));
    assert!(nav.tree().is_expanded(node(&nav, "Manual")), "index pages open their entry");
}

#[test]
fn expansion_is_idempotent() {
    let mut nav = started(MockHost::at("index.html", ""));
    let packages = node(&nav, "Packages");
    assert_eq!(
        nav.expand(packages),
        Ok(Expansion::Expanded { materialized: true })
    );
    let nodes = nav.tree().len();
    assert_eq!(nav.expand(packages), Ok(Expansion::AlreadyExpanded));
    assert_eq!(nav.tree().len(), nodes);
    assert!(nav.take_requests().is_empty());

    let expanded = nav
        .host()
        .events
        .iter()
        .filter(|e| matches!(e, RenderEvent::NodeExpanded { node, animate: true, .. } if *node == packages))
        .count();
    assert_eq!(expanded, 1);

    assert_eq!(nav.collapse(packages), Ok(true));
    assert_eq!(nav.collapse(packages), Ok(false));
    assert_eq!(
        nav.expand(packages),
        Ok(Expansion::Expanded { materialized: false })
    );
    assert_eq!(nav.tree().len(), nodes);
}

#[test]
fn concurrent_requests_share_one_fetch() {
    let mut nav = started(MockHost::at("index.html", ""));
    let classes = node(&nav, "Classes");
    assert_eq!(
        nav.expand(classes),
        Ok(Expansion::NeedsData("annotated".into()))
    );
    assert_eq!(
        nav.expand(classes),
        Ok(Expansion::NeedsData("annotated".into()))
    );
    nav.navigate(Location::parse("classPoint__2.html"));
    assert_eq!(
        nav.take_requests(),
        vec![ResourceId::Subtree("annotated".into()), ResourceId::Shard(0)]
    );
    assert!(nav.is_loading());

    nav.complete(ResourceId::Shard(0), Resource::from_json(&ResourceId::Shard(0), SHARD0));
    assert!(nav.take_requests().is_empty(), "subtree already in flight");
    assert_eq!(selected_label(&nav), Some("Manual"));

    nav.complete(
        ResourceId::Subtree("annotated".into()),
        Resource::from_json(&ResourceId::Subtree("annotated".into()), ANNOTATED),
    );
    assert!(!nav.is_loading());
    assert_eq!(nav.tree().children_of(classes).len(), 2);
    assert_eq!(selected_label(&nav), Some("Point_2"));
    assert_eq!(nav.breadcrumbs(), &[0, 2, 0]);
}

#[test]
fn loaded_subtrees_serve_later_references() {
    let mut nav = started(MockHost::at("index.html", ""));
    nav.expand(node(&nav, "Classes")).unwrap();
    block_on(nav.load_pending(&loader()));
    assert!(nav.registry().contains(&ResourceId::Subtree("annotated".into())));

    nav.expand(node(&nav, "Modules")).unwrap();
    let all = node(&nav, "All classes");
    assert_eq!(
        nav.expand(all),
        Ok(Expansion::Expanded { materialized: true })
    );
    assert!(nav.take_requests().is_empty());
    assert_eq!(nav.tree().children_of(all).len(), 2);
}

#[test]
fn breadcrumbs_round_trip() {
    let mut nav = started(MockHost::at("index.html", ""));
    let keys = [
        ("index.html", "Manual"),
        ("index.html#arr_secintro", "Introduction"),
        ("index.html#arr_secoverview", "Overview"),
        ("packages.html", "Packages"),
        ("packages.html#PartKernels", "Kernel"),
        ("packages.html#PartPolygons", "Polygons"),
        ("annotated.html", "Classes"),
        ("arrangements.html", "Arrangements"),
        ("classSegment__2.html", "Segment_2"),
        ("group__Geometry.html", "Geometry"),
    ];
    for (key, label) in keys {
        go(&mut nav, key);
        assert_eq!(selected_label(&nav), Some(label), "resolving {key}");
        let path = nav.tree().path_of(nav.selected().unwrap()).unwrap();
        assert_eq!(path.as_slice(), nav.breadcrumbs(), "resolving {key}");
        assert!(nav.tree().is_shown(nav.selected().unwrap()));
    }
}

#[test]
fn final_reference_is_fetched_before_selecting() {
    let mut nav = started(MockHost::at("index.html", ""));
    go(&mut nav, "arrangements.html");
    let arrangements = node(&nav, "Arrangements");
    assert_eq!(nav.selected(), Some(arrangements));
    assert!(nav.tree().is_expanded(arrangements));
    assert_eq!(nav.tree().children_of(arrangements).len(), 2);
}

#[test]
fn unknown_page_falls_back_to_the_root_page() {
    let mut nav = started(MockHost::at("index.html", ""));
    go(&mut nav, "packages.html#PartKernels");
    assert_eq!(selected_label(&nav), Some("Kernel"));
    let before = nav.host().events.len();

    go(&mut nav, "missing.html#nowhere");
    assert_eq!(selected_label(&nav), Some("Manual"));
    assert_eq!(nav.breadcrumbs(), &[0]);
    assert_eq!(nav.location(), Some(&Location::parse("index.html")));
    let after = &nav.host().events[before..];
    assert_eq!(after[0], RenderEvent::SelectionCleared);
    assert!(matches!(after[1], RenderEvent::Selected { previous: None, first_row: true, .. }));

    // A page in an unloaded shard that lacks it falls back the same way.
    go(&mut nav, "file_source.html");
    assert_eq!(selected_label(&nav), Some("Manual"));
}

#[test]
fn root_page_without_breadcrumbs_selects_nothing() {
    let mut nav = navigator(MockHost::at("index.html", ""));
    go(&mut nav, "aaa.html");
    assert_eq!(nav.location().map(|l| l.page.as_str()), Some("index.html"));
    assert_eq!(nav.selected(), None);
    assert!(nav.take_requests().is_empty());
}

#[test]
fn out_of_range_breadcrumb_selects_deepest_node() {
    let mut nav = started(MockHost::at("index.html", ""));
    go(&mut nav, "broken.html");
    let packages = node(&nav, "Packages");
    assert_eq!(nav.selected(), Some(packages));
    assert!(nav.tree().is_expanded(packages));
}

#[test]
fn line_anchor_never_moves_the_selection() {
    let host = MockHost::at("index.html", "").with_anchor("l00012", 120.0, AnchorKind::LineNumber);
    let mut nav = started(host);
    let manual = node(&nav, "Manual");
    assert_eq!(nav.selected(), Some(manual));
    let crumbs = nav.breadcrumbs().to_vec();
    let before = nav.host().events.len();

    go(&mut nav, "packages.html#l00012");
    assert_eq!(nav.selected(), Some(manual));
    assert_eq!(nav.breadcrumbs(), crumbs.as_slice());
    let after = &nav.host().events[before..];
    assert!(!after.iter().any(|e| matches!(e, RenderEvent::Selected { .. } | RenderEvent::SelectionCleared)));
    assert!(after.iter().any(|e| matches!(
        e,
        RenderEvent::Highlight(h) if h.kind == AnchorKind::LineNumber && h.duration_ms == 1000
    )));
    assert_eq!(scrolls(&nav, ScrollTarget::Content), vec![(0.0, 120.0, 120)]);
}

#[test]
fn line_anchor_on_first_load_still_fills_the_panel() {
    let host = MockHost::at("index.html", "#l7").with_anchor("l7", 80.0, AnchorKind::LineNumber);
    let nav = started(host);
    assert_eq!(selected_label(&nav), Some("Manual"));
    assert_eq!(nav.location(), Some(&Location::parse("index.html")));
}

#[test]
fn member_declarations_glow_briefly() {
    let host = MockHost::at("index.html", "#arr_secoverview").with_anchor(
        "arr_secoverview",
        40.0,
        AnchorKind::MemberDeclaration,
    );
    let nav = started(host);
    assert!(nav.host().events.iter().any(|e| matches!(
        e,
        RenderEvent::Highlight(h) if h.duration_ms == 300
    )));
    assert_eq!(scrolls(&nav, ScrollTarget::Content), vec![(0.0, 40.0, 50)]);
}

#[test]
fn missing_anchor_skips_the_highlight_only() {
    let nav = started(MockHost::at("index.html", "#arr_secintro"));
    assert_eq!(selected_label(&nav), Some("Introduction"));
    assert!(!nav.host().events.iter().any(|e| matches!(e, RenderEvent::Highlight(_))));
    assert!(scrolls(&nav, ScrollTarget::Content).is_empty());
    assert_eq!(scrolls(&nav, ScrollTarget::NavPanel).len(), 1);
}

#[test]
fn sync_toggle_controls_persistence() {
    let mut nav = started(MockHost::at("index.html", ""));
    assert!(nav.sync_enabled());
    assert!(nav.host().events.contains(&RenderEvent::SyncIndicator { enabled: true }));
    go(&mut nav, "packages.html");
    let polygons = node(&nav, "Polygons");

    nav.follow_link(polygons).unwrap();
    assert_eq!(nav.host().navigated, vec![String::from("packages.html#PartPolygons")]);
    assert_eq!(
        nav.host().storage.get("navpath").map(String::as_str),
        Some("packages.html#PartPolygons")
    );

    nav.set_sync(false);
    assert_eq!(nav.host().storage.get("navpath").map(String::as_str), Some(""));
    assert_eq!(nav.host().storage.get("navsync").map(String::as_str), Some("off"));
    nav.follow_link(polygons).unwrap();
    assert_eq!(nav.host().storage.get("navpath").map(String::as_str), Some(""));

    let indicators = |nav: &Navigator<MockHost>| {
        nav.host()
            .events
            .iter()
            .filter(|e| matches!(e, RenderEvent::SyncIndicator { .. }))
            .count()
    };
    let shown = indicators(&nav);
    nav.set_sync(false);
    assert_eq!(indicators(&nav), shown, "setting the same state is a no-op");

    assert!(nav.toggle_sync());
    assert_eq!(nav.host().storage.get("navsync").map(String::as_str), Some("on"));
    assert_eq!(nav.host().storage.get("navpath").map(String::as_str), Some(""));
    nav.follow_link(node(&nav, "Kernel")).unwrap();
    assert_eq!(
        nav.host().storage.get("navpath").map(String::as_str),
        Some("packages.html#PartKernels")
    );
}

#[test]
fn persisted_link_wins_at_start_up() {
    let mut host = MockHost::at("index.html", "");
    host.storage
        .insert("navpath".into(), "packages.html#PartKernels".into());
    let nav = started(host);
    assert_eq!(selected_label(&nav), Some("Kernel"));

    let mut host = MockHost::at("index.html", "");
    host.storage
        .insert("navpath".into(), "packages.html#PartKernels".into());
    host.storage.insert("navsync".into(), "off".into());
    let nav = started(host);
    assert!(!nav.sync_enabled());
    assert_eq!(selected_label(&nav), Some("Manual"));
}

#[test]
fn unsupported_storage_is_left_alone() {
    let mut host = MockHost::at("index.html", "");
    host.no_storage = true;
    let mut nav = started(host);
    go(&mut nav, "packages.html");
    nav.follow_link(node(&nav, "Kernel")).unwrap();
    nav.toggle_sync();
    assert!(nav.host().storage.is_empty());
    assert!(!nav.host().events.iter().any(|e| matches!(e, RenderEvent::SyncIndicator { .. })));
}

#[test]
fn in_page_link_scrolls_then_updates_the_fragment() {
    let host = MockHost::at("packages.html", "").with_anchor("PartPolygons", 900.0, AnchorKind::SectionHeader);
    let mut nav = started(host);
    go(&mut nav, "packages.html");
    let polygons = node(&nav, "Polygons");

    nav.follow_link(polygons).unwrap();
    assert!(nav.host().navigated.is_empty());
    assert_eq!(nav.selected(), Some(polygons));
    assert_eq!(scrolls(&nav, ScrollTarget::Content), vec![(0.0, 900.0, 500)]);
    assert!(nav.host().fragments.is_empty());

    nav.finish_animation();
    assert_eq!(nav.host().fragments, vec![String::from("PartPolygons")]);
    assert!(!nav.is_animating());
}

#[test]
fn entries_without_link_toggle() {
    let mut nav = started(MockHost::at("index.html", ""));
    let modules = node(&nav, "Modules");
    nav.follow_link(modules).unwrap();
    assert!(nav.tree().is_expanded(modules));
    nav.follow_link(modules).unwrap();
    assert!(!nav.tree().is_expanded(modules));
    assert!(nav.host().events.contains(&RenderEvent::NodeCollapsed {
        node: modules,
        icon: NodeIcon::Collapsed,
    }));
    assert!(nav.host().navigated.is_empty());
}

#[test]
fn scroll_during_an_animation_is_deferred() {
    let host = MockHost::at("index.html", "#arr_secintro")
        .with_anchor("arr_secintro", 300.0, AnchorKind::SectionHeader)
        .with_anchor("arr_secoverview", 100.0, AnchorKind::SectionHeader);
    let mut nav = started(host);
    assert!(nav.is_animating());

    go(&mut nav, "index.html#arr_secoverview");
    assert_eq!(selected_label(&nav), Some("Overview"));
    assert_eq!(scrolls(&nav, ScrollTarget::Content).len(), 1);

    nav.finish_animation();
    assert_eq!(
        scrolls(&nav, ScrollTarget::Content),
        vec![(0.0, 300.0, 300), (0.0, 100.0, 100)]
    );
    assert!(nav.is_animating());
}

#[test]
fn hash_changes() {
    let host = MockHost::at("index.html", "#arr_secintro").with_anchor("arr_secintro", 300.0, AnchorKind::Member);
    let mut nav = started(host);

    // An empty fragment during an animation is ignored.
    nav.host_mut().fragment = String::new();
    nav.on_hash_change();
    assert!(!nav.host().events.contains(&RenderEvent::ContentScrollReset));
    assert_eq!(selected_label(&nav), Some("Introduction"));

    nav.finish_animation();
    nav.on_hash_change();
    assert!(nav.host().events.contains(&RenderEvent::ContentScrollReset));
    assert_eq!(selected_label(&nav), Some("Manual"));

    nav.host_mut().pathname = "/doc/d1/d2a/packages.html".into();
    nav.host_mut().fragment = "#PartKernels".into();
    nav.on_hash_change();
    assert_eq!(
        nav.take_requests(),
        vec![ResourceId::Shard(0)],
        "hashed directories are part of the page key"
    );
    assert_eq!(nav.selected(), None);

    nav.host_mut().pathname = "/doc/packages.html".into();
    nav.on_hash_change();
    block_on(nav.load_pending(&loader()));
    assert_eq!(selected_label(&nav), Some("Kernel"));
}

#[test]
fn line_anchor_hash_change_keeps_the_selection() {
    let host = MockHost::at("index.html", "#arr_secintro")
        .with_anchor("arr_secintro", 300.0, AnchorKind::SectionHeader)
        .with_anchor("l42", 120.0, AnchorKind::LineNumber);
    let mut nav = started(host);
    nav.finish_animation();
    assert_eq!(selected_label(&nav), Some("Introduction"));
    let crumbs = nav.breadcrumbs().to_vec();
    let before = nav.host().events.len();

    nav.host_mut().fragment = "#l42".into();
    nav.on_hash_change();
    assert!(nav.take_requests().is_empty());
    block_on(nav.load_pending(&loader()));

    assert_eq!(selected_label(&nav), Some("Introduction"));
    assert_eq!(nav.breadcrumbs(), crumbs.as_slice());
    let after = &nav.host().events[before..];
    assert!(!after.iter().any(|e| matches!(e, RenderEvent::Selected { .. } | RenderEvent::SelectionCleared)));
    assert!(after.iter().any(|e| matches!(
        e,
        RenderEvent::Highlight(h) if h.anchor == "l42" && h.kind == AnchorKind::LineNumber
    )));
    assert_eq!(scrolls(&nav, ScrollTarget::Content).last(), Some(&(0.0, 120.0, 120)));
}

#[test]
fn references_with_the_same_identifier_share_one_fetch() {
    let data = NavData {
        tree: vec![EntryData::branch(
            "Manual",
            Some("index.html"),
            vec![
                EntryData::deferred("Package A", Some("pkg_a.html"), "pkg-a"),
                EntryData::deferred("Package A (by name)", Some("pkg_a.html"), "../Manual/pkg_a"),
            ],
        )],
        boundaries: vec!["index.html".into()],
    };
    let mut nav =
        Navigator::new(NavigatorConfig::default(), MockHost::at("index.html", ""), data).unwrap();
    let root = nav.tree().root();
    nav.expand(root).unwrap();
    let manual = node(&nav, "Manual");
    nav.expand(manual).unwrap();
    let first = node(&nav, "Package A");
    let second = node(&nav, "Package A (by name)");

    assert_eq!(nav.expand(first), Ok(Expansion::NeedsData("pkg-a".into())));
    assert_eq!(nav.expand(second), Ok(Expansion::NeedsData("../Manual/pkg_a".into())));
    let id = ResourceId::Subtree("pkg-a".into());
    assert_eq!(nav.take_requests(), vec![id.clone()]);

    let entries = vec![EntryData::leaf("AABB tree", Some("group__PkgAABB.html"))];
    nav.complete(id, Ok(Resource::Subtree(entries)));
    assert!(!nav.is_loading());
    assert!(nav.take_requests().is_empty());
    for parent in [first, second] {
        assert!(nav.tree().is_expanded(parent));
        assert_eq!(nav.tree().children_of(parent).len(), 1);
    }
}

#[test]
fn panel_scroll_waits_for_the_panel() {
    let mut host = MockHost::at("index.html", "");
    host.panel = None;
    let mut nav = started(host);
    assert_eq!(nav.poll(), Some(ScrollOutcome::Pending));
    assert!(scrolls(&nav, ScrollTarget::NavPanel).is_empty());

    nav.host_mut().panel = Some(PanelMetrics {
        viewport_height: 44.0,
        scroll_offset: 0.0,
    });
    assert_eq!(nav.poll(), Some(ScrollOutcome::Scheduled));
    assert_eq!(nav.poll(), None);
    assert_eq!(scrolls(&nav, ScrollTarget::NavPanel), vec![(0.0, 0.0, 50)]);

    go(&mut nav, "packages.html#PartPolygons");
    // Rows: Manual, Arrangements, Packages, Kernel, Polygons.
    assert_eq!(scrolls(&nav, ScrollTarget::NavPanel).last(), Some(&(0.0, 77.0, 77)));
}

#[test]
fn failed_loads_can_be_retried() {
    let mut nav = navigator(MockHost::at("index.html", ""));
    nav.init();
    let delivered = block_on(nav.load_pending(&StaticLoader::new()));
    assert_eq!(delivered, 1);
    assert_eq!(nav.selected(), None);
    assert!(!nav.is_loading());

    nav.navigate(Location::parse("index.html"));
    assert_eq!(nav.take_requests(), vec![ResourceId::Shard(1)]);
}

#[test]
fn superseded_navigation_keeps_its_data_but_not_the_selection() {
    let mut nav = started(MockHost::at("index.html", ""));
    nav.navigate(Location::parse("classPoint__2.html"));
    go(&mut nav, "packages.html");
    assert_eq!(selected_label(&nav), Some("Packages"));
    assert!(nav.index().is_loaded(0));
    assert!(!nav.tree().is_expanded(node(&nav, "Classes")));
}

#[test]
fn foreign_node_ids_are_rejected() {
    let loaded = started(MockHost::at("index.html", ""));
    let foreign = node(&loaded, "Modules");
    let mut fresh = navigator(MockHost::at("index.html", ""));
    assert_eq!(fresh.expand(foreign), Err(NavError::UnknownNode(foreign)));
    assert_eq!(fresh.follow_link(foreign), Err(NavError::UnknownNode(foreign)));
}
