// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External data resources: identifiers, payloads, the registry of loaded
//! resources, and the loader seam used by the async driver.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use futures::future::{self, LocalBoxFuture};
use hashbrown::HashMap;
use understory_nav_index::{Shard, strip_path};
use understory_nav_tree::EntryData;

use crate::error::LoadError;

/// Identifies one lazily fetched piece of navigation data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Children of an entry, named by the entry's reference (for example
    /// `general_intro` or `group__PkgAABB__tree`).
    Subtree(String),
    /// Shard `n` of the breadcrumb index.
    Shard(usize),
}

impl ResourceId {
    /// Script path relative to the current page, e.g. `../navtreeindex3.js`.
    pub fn script_path(&self, relpath: &str) -> String {
        match self {
            Self::Subtree(name) => format!("{relpath}{name}.js"),
            Self::Shard(n) => format!("{relpath}navtreeindex{n}.js"),
        }
    }

    /// Registry key: the last path segment with `-` replaced by `_`.
    ///
    /// Matches the variable name a generated data script declares.
    pub fn identifier(&self) -> String {
        match self {
            Self::Subtree(name) => subtree_identifier(name),
            Self::Shard(n) => format!("NAVTREEINDEX{n}"),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtree(name) => f.write_str(name),
            Self::Shard(n) => write!(f, "navtreeindex{n}"),
        }
    }
}

/// Registry key of a subtree reference.
pub(crate) fn subtree_identifier(name: &str) -> String {
    strip_path(name).replace('-', "_")
}

/// A loaded resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    /// Entries replacing a subtree reference.
    Subtree(Vec<EntryData>),
    /// One shard of the breadcrumb index.
    Shard(Shard),
}

impl Resource {
    /// Decode the JSON form of `id`: an entry array for subtrees, a key map for shards.
    #[cfg(feature = "serde")]
    pub fn from_json(id: &ResourceId, json: &str) -> Result<Self, LoadError> {
        let decode = |e: serde_json::Error| LoadError::Decode {
            id: id.clone(),
            message: format!("{e}"),
        };
        match id {
            ResourceId::Subtree(_) => serde_json::from_str(json).map(Self::Subtree).map_err(decode),
            ResourceId::Shard(_) => Shard::from_json(json).map(Self::Shard).map_err(decode),
        }
    }

    /// Returns `true` if this payload can answer a request for `id`.
    pub fn matches(&self, id: &ResourceId) -> bool {
        matches!(
            (self, id),
            (Self::Subtree(_), ResourceId::Subtree(_)) | (Self::Shard(_), ResourceId::Shard(_))
        )
    }
}

/// Resources that finished loading, keyed by [`ResourceId::identifier`].
///
/// Several entries may reference the same resource; once loaded, later
/// references are served from here without another fetch.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    loaded: HashMap<String, Resource>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loaded resource.
    pub fn insert(&mut self, id: &ResourceId, resource: Resource) {
        self.loaded.insert(id.identifier(), resource);
    }

    /// A loaded resource.
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.loaded.get(id.identifier().as_str())
    }

    /// Returns `true` once `id` has been loaded.
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.loaded.contains_key(id.identifier().as_str())
    }

    /// Number of loaded resources.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Returns `true` if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Future returned by a [`Loader`].
pub type LoadFuture<'a> = LocalBoxFuture<'a, Result<Resource, LoadError>>;

/// Source of navigation resources.
///
/// Implementations typically wrap a same-origin fetch. The future must not
/// block the thread it is polled on.
pub trait Loader {
    /// Start loading `id`. `relpath` is the navigator's relative path prefix.
    fn load<'a>(&'a self, id: &ResourceId, relpath: &str) -> LoadFuture<'a>;
}

/// Loader over resources registered up front.
///
/// ```rust
/// use understory_navigator::{Loader, Resource, ResourceId, StaticLoader};
/// use understory_nav_tree::EntryData;
///
/// let mut loader = StaticLoader::new();
/// loader.register(
///     ResourceId::Subtree("annotated".into()),
///     Resource::Subtree(vec![EntryData::leaf("Point_2", Some("classPoint__2.html"))]),
/// );
/// let loaded = futures::executor::block_on(loader.load(&ResourceId::Subtree("annotated".into()), ""));
/// assert!(loaded.is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    resources: HashMap<String, Resource>,
}

impl StaticLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resource` under `id`.
    pub fn register(&mut self, id: ResourceId, resource: Resource) -> &mut Self {
        self.resources.insert(id.identifier(), resource);
        self
    }

    /// Decode and register the JSON form of `id`.
    #[cfg(feature = "serde")]
    pub fn register_json(&mut self, id: ResourceId, json: &str) -> Result<&mut Self, LoadError> {
        let resource = Resource::from_json(&id, json)?;
        Ok(self.register(id, resource))
    }
}

impl Loader for StaticLoader {
    fn load<'a>(&'a self, id: &ResourceId, _relpath: &str) -> LoadFuture<'a> {
        let result = match self.resources.get(id.identifier().as_str()) {
            Some(resource) if resource.matches(id) => Ok(resource.clone()),
            Some(_) => Err(LoadError::KindMismatch(id.clone())),
            None => Err(LoadError::NotFound(id.clone())),
        };
        Box::pin(future::ready(result))
    }
}

/// Everything a navigator needs up front: the top-level entries and the
/// shard boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavData {
    /// Top-level entries (`NAVTREE`).
    pub tree: Vec<EntryData>,
    /// Sorted shard boundary keys (`NAVTREEINDEX`).
    pub boundaries: Vec<String>,
}

impl NavData {
    /// Decode both parts from their JSON forms.
    #[cfg(feature = "serde")]
    pub fn from_json(tree: &str, boundaries: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            tree: serde_json::from_str(tree)?,
            boundaries: understory_nav_index::ShardIndex::boundaries_from_json(boundaries)?,
        })
    }

    /// Link of the first top-level entry: the page the panel falls back to.
    pub fn root_page(&self) -> Option<&str> {
        self.tree.first().and_then(|e| e.link.as_deref())
    }
}
