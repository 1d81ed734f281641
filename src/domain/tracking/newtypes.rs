// SPDX-License-Identifier: MPL-2.0
//! Tracking newtypes.
//!
//! This module provides type-safe wrappers for the engine's tunable values,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_HISTORY_CAPACITY, DEFAULT_MIN_SEEK_GAP_SECS, MAX_DEBOUNCE_MS,
    MAX_HISTORY_CAPACITY, MAX_MIN_SEEK_GAP_SECS, MIN_DEBOUNCE_MS, MIN_HISTORY_CAPACITY,
    MIN_MIN_SEEK_GAP_SECS,
};
use std::time::Duration;

// =============================================================================
// MinSeekGap
// =============================================================================

/// Minimum distance in seconds between two remembered positions, and the
/// smallest position worth remembering at all.
///
/// This newtype enforces validity at the type level, ensuring the value is
/// always within the valid range (1.0–120.0 seconds). Two positions closer
/// together than this gap would land the user in virtually the same spot,
/// so only one of them is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinSeekGap(f64);

impl MinSeekGap {
    /// Creates a new minimum seek gap, clamping to valid range.
    #[must_use]
    pub fn new(secs: f64) -> Self {
        Self(secs.clamp(MIN_MIN_SEEK_GAP_SECS, MAX_MIN_SEEK_GAP_SECS))
    }

    /// Returns the gap in seconds.
    #[must_use]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// Returns true if `a` and `b` are separated by less than the gap.
    ///
    /// A distance exactly equal to the gap does NOT count as "within":
    /// boundary distances are accepted by the recorder.
    #[must_use]
    pub fn within(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.0
    }
}

impl Default for MinSeekGap {
    fn default() -> Self {
        Self(DEFAULT_MIN_SEEK_GAP_SECS)
    }
}

// =============================================================================
// HistoryCapacity
// =============================================================================

/// Maximum number of entries kept in the position history.
///
/// This newtype enforces validity at the type level, ensuring the value is
/// always within the valid range (1–50).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCapacity(usize);

impl HistoryCapacity {
    /// Creates a new history capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY))
    }

    /// Returns the capacity as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for HistoryCapacity {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_CAPACITY)
    }
}

// =============================================================================
// DebounceWindow
// =============================================================================

/// Sliding window after an accepted keyboard/button seek during which
/// further ones are suppressed.
///
/// This newtype enforces validity at the type level, ensuring the value is
/// always within the valid range (500–30000 milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindow(Duration);

impl DebounceWindow {
    /// Creates a new debounce window from milliseconds, clamping to valid
    /// range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS)))
    }

    /// Returns the window as a Duration.
    #[must_use]
    pub fn duration(self) -> Duration {
        self.0
    }
}

impl Default for DebounceWindow {
    fn default() -> Self {
        Self(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

// =============================================================================
// Tests
// =============================================================================
