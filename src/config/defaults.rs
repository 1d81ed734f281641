// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for the tracking engine's tunables.
//!
//! This module is the single source of truth for default values and
//! clamping bounds used across the crate. Constants are organized by
//! category.
//!
//! # Categories
//!
//! - **Seek History**: minimum gap between remembered positions, capacity
//! - **Debounce**: suppression window for rapid keyboard/button seeks
//! - **Readiness**: load-time capture window, settle delay, fallback buffer
//! - **Polling**: bounded tick interval for the controller

// ==========================================================================
// Seek History Defaults
// ==========================================================================

/// Default minimum distance (in seconds) between two remembered positions.
/// Also the minimum position worth remembering at all.
pub const DEFAULT_MIN_SEEK_GAP_SECS: f64 = 15.0;

/// Minimum allowed seek gap.
pub const MIN_MIN_SEEK_GAP_SECS: f64 = 1.0;

/// Maximum allowed seek gap.
pub const MAX_MIN_SEEK_GAP_SECS: f64 = 120.0;

/// Default number of positions kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Minimum allowed history capacity.
pub const MIN_HISTORY_CAPACITY: usize = 1;

/// Maximum allowed history capacity.
pub const MAX_HISTORY_CAPACITY: usize = 50;

// ==========================================================================
// Debounce Defaults
// ==========================================================================

/// Default debounce window (in milliseconds) after an accepted
/// keyboard/button seek during which further ones are suppressed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 5000;

/// Minimum allowed debounce window.
pub const MIN_DEBOUNCE_MS: u64 = 500;

/// Maximum allowed debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 30_000;

// ==========================================================================
// Readiness Defaults
// ==========================================================================

/// Window (in milliseconds) after setup during which the load-time
/// position is captured.
pub const DEFAULT_CAPTURE_WINDOW_MS: u64 = 1000;

/// Settle delay (in milliseconds) between the load-time capture and the
/// transition to ready, and between a live reading and its stable commit.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// Fixed buffer (in milliseconds) added on top of the capture window and
/// settle delay when arming the readiness fallback timer.
pub const READY_FALLBACK_BUFFER_MS: u64 = 2000;

// ==========================================================================
// Polling Defaults
// ==========================================================================

/// Default bounded polling tick interval (in milliseconds) at which hosts
/// should drive [`poll`](crate::tracker::SeekTracker::poll).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Position delta (in seconds) below which two consecutive readings are
/// considered the same observation rather than a change.
pub const POSITION_EPSILON_SECS: f64 = 0.001;
