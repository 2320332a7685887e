// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless navigation panel: resolve a page, expand its path, follow links.
//!
//! This example shows how to combine:
//! - `understory_nav_tree` entries, decoded from JSON or built in code,
//! - `understory_nav_index` shards loaded on demand,
//! - `understory_navigator` driving both through a printing host.
//!
//! Run:
//! - `cargo run -p understory_nav_demos --example headless_navigation`

use std::collections::HashMap;

use futures::executor::block_on;
use kurbo::Rect;
use understory_nav_index::Location;
use understory_nav_tree::EntryData;
use understory_navigator::{
    AnchorInfo, AnchorKind, ContentMetrics, Host, NavData, Navigator, NavigatorConfig,
    PanelMetrics, RenderEvent, Resource, ResourceId, StaticLoader,
};

const NAVTREE: &str = r#"[["CGAL 5.0 - Manual", "index.html", [
    ["Arrangements", "index.html#arr_secintro", "arrangements"],
    ["Package Overview", "packages.html", [
        ["Geometry Kernels", "packages.html#PartKernels", null],
        ["Polygons", "packages.html#PartPolygons", null]
    ]],
    ["External Site", "^https://www.cgal.org/", null]
]]]"#;

const BOUNDARIES: &str = r#"["index.html"]"#;

const SHARD0: &str = r#"{
    "index.html": [],
    "index.html#arr_secintro": [0],
    "index.html#arr_secoverview": [0, 0],
    "packages.html": [1],
    "packages.html#PartKernels": [1, 0],
    "packages.html#PartPolygons": [1, 1]
}"#;

/// A page that prints what the panel would draw.
#[derive(Debug, Default)]
struct ConsolePage {
    pathname: String,
    fragment: String,
    storage: HashMap<String, String>,
}

impl Host for ConsolePage {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        println!("location hash <- #{fragment}");
        self.fragment = format!("#{fragment}");
    }

    fn navigate(&mut self, url: &str) {
        println!("load page {url}");
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn storage_set(&mut self, key: &str, value: &str) {
        println!("storage[{key}] = {value:?}");
        self.storage.insert(key.into(), value.into());
    }

    fn anchor(&self, name: &str) -> Option<AnchorInfo> {
        // Pretend every anchor is a section heading 480 px down the page.
        Some(AnchorInfo {
            rect: Rect::new(0.0, 480.0, 800.0, 510.0),
            kind: if name.starts_with('l') {
                AnchorKind::LineNumber
            } else {
                AnchorKind::SectionHeader
            },
        })
    }

    fn panel(&self) -> Option<PanelMetrics> {
        Some(PanelMetrics {
            viewport_height: 300.0,
            scroll_offset: 0.0,
        })
    }

    fn content(&self) -> Option<ContentMetrics> {
        Some(ContentMetrics {
            scroll_offset: 0.0,
            viewport_height: 700.0,
            content_height: 4000.0,
        })
    }

    fn render(&mut self, event: RenderEvent) {
        match event {
            RenderEvent::NodeCreated {
                label,
                href,
                indent,
                icon,
                ..
            } => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Indentation is a small whole number of pixels"
                )]
                let width = (indent / 8.0) as usize;
                println!(
                    "{:width$}[{}] {label} -> {}",
                    "",
                    icon.file_name(),
                    href.as_deref().unwrap_or("-"),
                );
            }
            other => println!("{other:?}"),
        }
    }
}

fn main() {
    let data = NavData::from_json(NAVTREE, BOUNDARIES).expect("navigation data");
    let mut loader = StaticLoader::new();
    loader
        .register_json(ResourceId::Shard(0), SHARD0)
        .expect("index shard")
        .register(
            ResourceId::Subtree("arrangements".into()),
            Resource::Subtree(vec![
                EntryData::leaf("Overview", Some("index.html#arr_secoverview")),
                EntryData::leaf("Curves", Some("Arrangement_on_surface_2/index.html")),
            ]),
        );

    let page = ConsolePage {
        pathname: "/doc/Manual/index.html".into(),
        fragment: "#arr_secintro".into(),
        ..Default::default()
    };
    let mut nav = Navigator::new(NavigatorConfig::default(), page, data).expect("navigator");

    println!("\n== Start-up: index.html#arr_secintro ==");
    nav.init();
    let delivered = block_on(nav.load_pending(&loader));
    println!("resources delivered: {delivered}");
    println!("breadcrumbs: {:?}", nav.breadcrumbs());
    nav.finish_animation();

    println!("\n== Open the package overview ==");
    nav.navigate(Location::parse("packages.html#PartPolygons"));
    block_on(nav.load_pending(&loader));
    println!("breadcrumbs: {:?}", nav.breadcrumbs());

    println!("\n== Follow an external link ==");
    let tree = nav.tree();
    let external = tree
        .find(|id| tree.label(id) == Some("External Site"))
        .expect("external entry");
    nav.follow_link(external).expect("known node");

    println!("\n== Turn sync off ==");
    nav.toggle_sync();
    println!("sync enabled: {}", nav.sync_enabled());
}
