// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator configuration.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Per-view navigator settings.
///
/// The defaults match the classic documentation theme: 22 px rows indented
/// 16 px per level, link persistence under `navpath`, scroll animations
/// between 50 and 500 ms.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NavigatorConfig {
    /// Prefix from the current page to the documentation root (e.g. `../`).
    pub relpath: String,
    /// Page this view resolves when the URL carries no other information.
    pub root_page: String,
    /// Storage key of the persisted link.
    pub link_key: String,
    /// Storage key of the persisted sync preference.
    pub sync_key: String,
    /// Sync state used when no preference is stored.
    pub sync_default: bool,
    /// Root page base names that also expand the selected entry.
    pub auto_expand_roots: Vec<String>,
    /// Height of one panel row.
    pub row_height: f64,
    /// Indentation per tree level.
    pub indent: f64,
    /// Scroll animation timing.
    pub scroll: ScrollConfig,
    /// Highlight timing.
    pub highlight: HighlightConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            relpath: String::new(),
            root_page: String::from("index.html"),
            link_key: String::from("navpath"),
            sync_key: String::from("navsync"),
            sync_default: true,
            auto_expand_roots: vec!["index".into(), "pages".into(), "search".into()],
            row_height: 22.0,
            indent: 16.0,
            scroll: ScrollConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl NavigatorConfig {
    /// Configuration for a page at `relpath` whose own root page is `root_page`.
    pub fn for_page(relpath: impl Into<String>, root_page: impl Into<String>) -> Self {
        Self {
            relpath: relpath.into(),
            root_page: root_page.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// ```rust
    /// use understory_navigator::NavigatorConfig;
    ///
    /// let config = NavigatorConfig::from_toml_str(r#"
    ///     relpath = "../"
    ///     [scroll]
    ///     max_ms = 300
    /// "#).unwrap();
    /// assert_eq!(config.relpath, "../");
    /// assert_eq!(config.scroll.max_ms, 300);
    /// assert_eq!(config.scroll.min_ms, 50);
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(text: &str) -> Result<Self, crate::error::ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Scroll animation timing; the duration is the distance in pixels, clamped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScrollConfig {
    /// Shortest animation.
    pub min_ms: u32,
    /// Longest animation.
    pub max_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            min_ms: 50,
            max_ms: 500,
        }
    }
}

/// How long highlighted content glows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HighlightConfig {
    /// Member declaration rows without a detailed description.
    pub declaration_ms: u32,
    /// Everything else: members, enum values, fields, headers, source lines.
    pub default_ms: u32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            declaration_ms: 300,
            default_ms: 1000,
        }
    }
}
