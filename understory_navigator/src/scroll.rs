// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll targets, animation descriptors and the maths behind them.

use crate::config::ScrollConfig;

/// Which scrollable area an animation drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The navigation panel.
    NavPanel,
    /// The documentation content.
    Content,
}

/// A scroll animation for the host to run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollAnimation {
    /// Area to scroll.
    pub target: ScrollTarget,
    /// Offset at the start.
    pub from: f64,
    /// Offset at the end.
    pub to: f64,
    /// Duration of the animation.
    pub duration_ms: u32,
}

/// What a scroll request turned into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// An animation was sent to the host.
    Scheduled,
    /// Another content animation is running; this one starts when it ends.
    Deferred,
    /// The panel is not laid out yet; [`Navigator::poll`](crate::Navigator::poll) retries.
    Pending,
    /// Nothing to scroll to: no selection, a hidden row, or a missing anchor.
    Skipped,
}

/// Animation duration for a scroll over `distance` pixels.
///
/// One millisecond per pixel, clamped to the configured range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Value is clamped to a u32 range before the cast"
)]
pub fn duration_for(distance: f64, config: &ScrollConfig) -> u32 {
    let lo = f64::from(config.min_ms);
    let hi = f64::from(config.max_ms.max(config.min_ms));
    distance.abs().clamp(lo, hi) as u32
}

/// Offset that centres row `row` of height `row_height` in a viewport of
/// `viewport` pixels, never negative.
pub fn center_offset(row: usize, row_height: f64, viewport: f64) -> f64 {
    let start = row as f64 * row_height;
    let end = start + row_height;
    ((start + end) / 2.0 - viewport / 2.0).max(0.0)
}
