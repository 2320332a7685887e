// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static entry descriptors the tree is materialized from.

use alloc::string::String;
use alloc::vec::Vec;

/// Children of an entry, as declared by the navigation data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChildrenData {
    /// No children; the entry is a leaf forever.
    #[default]
    Leaf,
    /// Children declared inline, in display order.
    Inline(Vec<EntryData>),
    /// Children live in a separately loaded resource with this name.
    Reference(String),
}

impl ChildrenData {
    /// Returns `true` for [`ChildrenData::Leaf`].
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Name of the external resource, if the children are not loaded yet.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// One `[label, link, children]` triple of navigation data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryData {
    /// Display text.
    pub label: String,
    /// Target link, relative to the documentation root unless prefixed with `^`.
    pub link: Option<String>,
    /// Child descriptor.
    pub children: ChildrenData,
}

impl EntryData {
    /// Leaf entry.
    pub fn leaf(label: impl Into<String>, link: Option<&str>) -> Self {
        Self {
            label: label.into(),
            link: link.map(String::from),
            children: ChildrenData::Leaf,
        }
    }

    /// Entry with inline children.
    pub fn branch(label: impl Into<String>, link: Option<&str>, children: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            link: link.map(String::from),
            children: ChildrenData::Inline(children),
        }
    }

    /// Entry whose children are loaded from the resource `name`.
    pub fn deferred(label: impl Into<String>, link: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.map(String::from),
            children: ChildrenData::Reference(name.into()),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawChildren {
    Inline(Vec<EntryData>),
    Reference(String),
}

/// Decodes the `[label, link|null, children|"name"|null]` triple form.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EntryData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (label, link, children) =
            <(String, Option<String>, Option<RawChildren>)>::deserialize(deserializer)?;
        let children = match children {
            None => ChildrenData::Leaf,
            Some(RawChildren::Inline(list)) => ChildrenData::Inline(list),
            Some(RawChildren::Reference(name)) => ChildrenData::Reference(name),
        };
        Ok(Self {
            label,
            link,
            children,
        })
    }
}
