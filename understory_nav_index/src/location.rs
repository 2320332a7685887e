// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page + fragment keys and the small path helpers the navigation data relies on.

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// A page and an optional in-page fragment.
///
/// The fragment is stored without its leading `#`; an empty fragment means
/// "the page itself".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// Page identifier, for example `index.html` or `d1/d23/file.html`.
    pub page: String,
    /// Fragment without `#`.
    pub fragment: String,
}

impl Location {
    /// Build a location; a leading `#` on `fragment` is dropped.
    pub fn new(page: impl Into<String>, fragment: &str) -> Self {
        Self {
            page: page.into(),
            fragment: fragment.strip_prefix('#').unwrap_or(fragment).to_string(),
        }
    }

    /// Split `"page#fragment"` at the first `#`.
    ///
    /// A second `#` and anything after it is ignored.
    pub fn parse(link: &str) -> Self {
        match link.split_once('#') {
            Some((page, rest)) => Self {
                page: page.to_string(),
                fragment: rest.split('#').next().unwrap_or_default().to_string(),
            },
            None => Self {
                page: link.to_string(),
                fragment: String::new(),
            },
        }
    }

    /// Returns `true` if a fragment is present.
    pub fn has_fragment(&self) -> bool {
        !self.fragment.is_empty()
    }

    /// Index key: `page#fragment`, or just `page` without a fragment.
    pub fn key(&self) -> String {
        if self.fragment.is_empty() {
            self.page.clone()
        } else {
            format!("{}#{}", self.page, self.fragment)
        }
    }

    /// Returns `true` if the fragment references a source line (`l<digits>`).
    pub fn is_line_anchor(&self) -> bool {
        is_line_anchor(&self.fragment)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fragment.is_empty() {
            f.write_str(&self.page)
        } else {
            write!(f, "{}#{}", self.page, self.fragment)
        }
    }
}

/// Returns `true` for line-number fragments such as `l42` (with or without `#`).
pub fn is_line_anchor(fragment: &str) -> bool {
    let f = fragment.strip_prefix('#').unwrap_or(fragment);
    f.strip_prefix('l')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Last path segment of `uri`.
pub fn strip_path(uri: &str) -> &str {
    uri.rsplit_once('/').map_or(uri, |(_, last)| last)
}

/// Like [`strip_path`], but keeps two levels of hashed output directories.
///
/// Documentation generated with directory hashing stores pages under
/// `dX/dXX/`; those two segments are part of the page identifier.
pub fn strip_path2(uri: &str) -> &str {
    let Some(i) = uri.rfind('/') else {
        return uri;
    };
    let prefix = &uri.as_bytes()[..=i];
    let word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    if prefix.len() >= 8 {
        let t = &prefix[prefix.len() - 8..];
        if t[0] == b'/'
            && t[1] == b'd'
            && word(t[2])
            && t[3] == b'/'
            && t[4] == b'd'
            && word(t[5])
            && word(t[6])
            && t[7] == b'/'
        {
            return &uri[i - 6..];
        }
    }
    &uri[i + 1..]
}

/// Class name the panel gives an entry's link: last segment with `#` turned into `:`.
///
/// The entry matching the current page and fragment is the one whose class
/// ends with `strip_path(pathname) + ":" + fragment`.
pub fn link_class(link: &str) -> String {
    strip_path(&link.replacen('#', ":", 1)).to_string()
}

/// Base name of a page: last segment up to the first `.`.
pub fn base_name(page: &str) -> &str {
    let last = strip_path(page);
    last.split_once('.').map_or(last, |(base, _)| base)
}

/// Outcome of resolving an entry link against the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Link as persisted when followed (`^` prefix removed).
    pub link: String,
    /// URL to load.
    pub url: String,
    /// Fragment of the link, if any.
    pub anchor: Option<String>,
    /// The link points into the page currently shown.
    pub same_page: bool,
}

/// Resolve an entry link.
///
/// Links starting with `^` are absolute and used as is; everything else is
/// prefixed with `relpath`. A link with a fragment whose page is the page in
/// `pathname` stays on the current page.
pub fn resolve_link(link: &str, relpath: &str, pathname: &str) -> ResolvedLink {
    let (link, url) = match link.strip_prefix('^') {
        Some(abs) => (abs.to_string(), abs.to_string()),
        None => (link.to_string(), format!("{relpath}{link}")),
    };
    let (anchor, same_page) = match link.split_once('#') {
        Some((target, rest)) => {
            let anchor = rest.split('#').next().unwrap_or_default().to_string();
            (Some(anchor), strip_path(pathname) == strip_path(target))
        }
        None => (None, false),
    };
    ResolvedLink {
        link,
        url,
        anchor,
        same_page,
    }
}
