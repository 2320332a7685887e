// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link persistence and the sync toggle.

use alloc::string::String;

use crate::config::NavigatorConfig;
use crate::host::Host;

const ON: &str = "on";
const OFF: &str = "off";

/// Persisted link plus the sync preference guarding it.
///
/// While sync is enabled every followed link is written under the link key.
/// Toggling clears the stored link in both directions. The preference itself
/// lives under the sync key.
#[derive(Clone, Debug)]
pub(crate) struct LinkStore {
    link_key: String,
    sync_key: String,
    enabled: bool,
    supported: bool,
}

impl LinkStore {
    /// Read the stored preference, falling back to the configured default.
    pub(crate) fn load<H: Host>(config: &NavigatorConfig, host: &H) -> Self {
        let supported = host.storage_supported();
        let enabled = if supported {
            match host.storage_get(&config.sync_key).as_deref() {
                Some(ON) => true,
                Some(OFF) => false,
                _ => config.sync_default,
            }
        } else {
            config.sync_default
        };
        Self {
            link_key: config.link_key.clone(),
            sync_key: config.sync_key.clone(),
            enabled,
            supported,
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn supported(&self) -> bool {
        self.supported
    }

    /// The stored link, if sync is on and one was stored.
    pub(crate) fn cached_link<H: Host>(&self, host: &H) -> Option<String> {
        if !(self.supported && self.enabled) {
            return None;
        }
        host.storage_get(&self.link_key).filter(|l| !l.is_empty())
    }

    /// Remember a followed link.
    pub(crate) fn store<H: Host>(&self, host: &mut H, link: &str) {
        if self.supported && self.enabled {
            tracing::trace!(link, "storing followed link");
            host.storage_set(&self.link_key, link);
        }
    }

    /// Switch sync on or off. Returns `false` if nothing changed.
    pub(crate) fn set_enabled<H: Host>(&mut self, host: &mut H, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if self.supported {
            host.storage_set(&self.link_key, "");
            host.storage_set(&self.sync_key, if enabled { ON } else { OFF });
        }
        true
    }
}
