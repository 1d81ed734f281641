// SPDX-License-Identifier: MPL-2.0
//! Position-history and readiness-tracking engine.
//!
//! The engine decides, from noisy and delayed signals, when a media
//! element is reliably ready for tracking, which candidate playback
//! positions deserve remembering, and when the tracked content has
//! changed so stale state must be discarded.
//!
//! Component layout, leaves first:
//!
//! - [`stable_time`]: settle-delayed, race-resistant current-time reading
//! - [`readiness`]: gates when recording may begin; captures the
//!   load-time position
//! - [`recorder`]: accepts/rejects candidate positions, with distinct
//!   policies for timeline vs keyboard/button seeks
//! - [`identity`]: detects genuinely new content and requests a reset
//! - [`controller`]: wires the above to the host ports and owns lifecycle
//! - [`timers`]: the cooperative timer queue everything schedules on

pub mod controller;
pub mod identity;
pub mod readiness;
pub mod recorder;
pub mod stable_time;
pub mod timers;

pub use controller::SeekTracker;
pub use identity::{ContentIdentityMonitor, IdentityMode, IdentityVerdict, NewContentReason};
pub use readiness::{is_video_loaded, ReadinessPhase, ReadinessTracker};
pub use recorder::{
    PositionOrigin, PositionRecorder, RecalledPosition, RecordOutcome, SeekModality,
};
pub use stable_time::StableTimeTracker;
pub use timers::{TimerClass, TimerId, TimerQueue};

use crate::config::defaults::{
    DEFAULT_CAPTURE_WINDOW_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_DELAY_MS,
    READY_FALLBACK_BUFFER_MS,
};
use crate::config::Config;
use crate::domain::tracking::{DebounceWindow, HistoryCapacity, MinSeekGap};
use std::time::Duration;

/// Resolved engine parameters, clamped to valid ranges.
///
/// Built from defaults or from a persisted [`Config`]; the engine never
/// reads configuration files itself.
#[derive(Debug, Clone, Copy)]
pub struct TrackerParams {
    /// Minimum distance between remembered positions.
    pub min_gap: MinSeekGap,
    /// Bound on the position history.
    pub capacity: HistoryCapacity,
    /// Suppression window for keyboard/button seeks.
    pub debounce: DebounceWindow,
    /// Window after setup during which the load-time position is captured.
    pub capture_window: Duration,
    /// Settle delay for the capture-to-ready transition and the stable
    /// time commit.
    pub settle_delay: Duration,
    /// Extra buffer on the readiness fallback timer.
    pub fallback_buffer: Duration,
    /// Bounded tick interval hosts should drive `poll` at.
    pub poll_interval: Duration,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            min_gap: MinSeekGap::default(),
            capacity: HistoryCapacity::default(),
            debounce: DebounceWindow::default(),
            capture_window: Duration::from_millis(DEFAULT_CAPTURE_WINDOW_MS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            fallback_buffer: Duration::from_millis(READY_FALLBACK_BUFFER_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl TrackerParams {
    /// Resolves persisted preferences, clamping every value and falling
    /// back to defaults for absent fields.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            min_gap: config
                .min_seek_gap_secs
                .map_or(defaults.min_gap, MinSeekGap::new),
            capacity: config
                .history_capacity
                .map_or(defaults.capacity, |c| HistoryCapacity::new(c as usize)),
            debounce: config
                .debounce_ms
                .map_or(defaults.debounce, DebounceWindow::from_millis),
            capture_window: config
                .capture_window_ms
                .map_or(defaults.capture_window, Duration::from_millis),
            settle_delay: config
                .settle_delay_ms
                .map_or(defaults.settle_delay, Duration::from_millis),
            fallback_buffer: defaults.fallback_buffer,
            poll_interval: config
                .poll_interval_ms
                .map_or(defaults.poll_interval, Duration::from_millis),
        }
    }
}
