// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use understory_nav_index::IndexError;
use understory_nav_tree::NodeId;

use crate::resource::ResourceId;

/// Why a resource could not be provided.
///
/// None of these reach the user: a failed load leaves the affected subtree or
/// shard unopened and is logged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The loader has nothing registered under this id.
    #[error("resource `{0}` is not registered")]
    NotFound(ResourceId),
    /// The resource arrived but could not be decoded.
    #[error("resource `{id}` could not be decoded: {message}")]
    Decode {
        /// Resource being decoded.
        id: ResourceId,
        /// Decoder message.
        message: String,
    },
    /// A subtree was delivered for a shard request or the other way around.
    #[error("resource `{0}` has the wrong kind")]
    KindMismatch(ResourceId),
    /// Transport-level failure reported by the host.
    #[error("resource `{id}` failed to load: {message}")]
    Transport {
        /// Resource being fetched.
        id: ResourceId,
        /// Host message.
        message: String,
    },
}

/// Errors returned by [`Navigator`](crate::Navigator) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The node id does not belong to this navigator's tree.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// The index boundaries are unusable.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors raised while reading a configuration.
#[cfg(feature = "toml")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text is malformed or has the wrong shape.
    #[error("invalid navigator configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
