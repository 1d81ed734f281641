// SPDX-License-Identifier: MPL-2.0
//! Position recording policies.
//!
//! Decides whether a candidate playback position is remembered. Two entry
//! points with distinct policies:
//!
//! - [`record_direct`](PositionRecorder::record_direct): the save
//!   primitive, used for timeline (direct) seeks. Distance rules only,
//!   never debounced.
//! - [`record_debounced`](PositionRecorder::record_debounced): used for
//!   keyboard/button (indirect) seeks. The save primitive runs only once
//!   the sliding debounce window check passes, and only an accepted save
//!   refreshes the window. A rejected save never starts or extends a
//!   debounce window, for any rejection reason.

use crate::domain::tracking::{
    DebounceWindow, HistoryCapacity, MinSeekGap, PositionEntry, PositionHistory,
};
use std::time::Instant;
use tracing::debug;

/// How a seek was initiated, chosen by the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekModality {
    /// Timeline interaction: the user pointed at an absolute position.
    Direct,
    /// Keyboard or button step: one of a possibly rapid burst.
    Indirect,
}

/// Outcome of a record attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The position was appended to the history.
    Accepted,
    /// Suppressed by the sliding debounce window (indirect path only).
    Debounced,
    /// Rejected: below the minimum position worth remembering.
    BelowMinimum,
    /// Rejected: within the minimum gap of the load-time position.
    NearLoadTime,
    /// Rejected: within the minimum gap of an existing entry.
    NearExisting,
    /// The controller is not tracking a ready element.
    NotReady,
}

impl RecordOutcome {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        self == RecordOutcome::Accepted
    }

    /// True for the three distance rejections (not debounce, not gating).
    #[must_use]
    pub fn is_rejected(self) -> bool {
        matches!(
            self,
            RecordOutcome::BelowMinimum | RecordOutcome::NearLoadTime | RecordOutcome::NearExisting
        )
    }
}

/// Where a recalled position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrigin {
    /// Captured shortly after setup: where playback auto-resumed.
    LoadTime,
    /// Remembered from a seek.
    SeekHistory,
}

/// One entry of the list handed to the dialog layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalledPosition {
    /// Playback position in seconds.
    pub time: f64,
    /// When the entry was saved. `None` for the synthetic load-time entry.
    pub saved_at: Option<Instant>,
    pub origin: PositionOrigin,
}

/// Recorder state: the history plus the load-time position and the
/// debounce bookkeeping. One per controller; fully cleared on reset.
#[derive(Debug)]
pub struct PositionRecorder {
    history: PositionHistory,
    load_time_position: Option<f64>,
    last_accepted: Option<Instant>,
    min_gap: MinSeekGap,
    debounce: DebounceWindow,
}

impl PositionRecorder {
    #[must_use]
    pub fn new(min_gap: MinSeekGap, capacity: HistoryCapacity, debounce: DebounceWindow) -> Self {
        Self {
            history: PositionHistory::new(capacity),
            load_time_position: None,
            last_accepted: None,
            min_gap,
            debounce,
        }
    }

    /// The save primitive. Applies the distance rules and appends on
    /// acceptance, evicting the oldest entry past capacity.
    ///
    /// A distance exactly equal to the minimum gap is accepted; only
    /// strictly smaller distances reject. Never touches the debounce
    /// window.
    pub fn record_direct(&mut self, position: f64, now: Instant) -> RecordOutcome {
        if position < self.min_gap.secs() {
            return RecordOutcome::BelowMinimum;
        }
        if let Some(load_time) = self.load_time_position {
            if self.min_gap.within(position, load_time) {
                return RecordOutcome::NearLoadTime;
            }
        }
        if let Some(gap) = self.history.nearest_gap(position) {
            if gap < self.min_gap.secs() {
                return RecordOutcome::NearExisting;
            }
        }
        let evicted = self.history.push(PositionEntry {
            time: position,
            saved_at: now,
        });
        if let Some(old) = evicted {
            debug!(time = old.time, "evicted oldest position");
        }
        debug!(time = position, "position remembered");
        RecordOutcome::Accepted
    }

    /// Debounced wrapper around the save primitive.
    ///
    /// A call inside the window is suppressed before any save runs. An
    /// accepted save refreshes the window; a rejected one leaves it
    /// untouched, so a rejected burst never locks out the next qualifying
    /// call.
    pub fn record_debounced(&mut self, position: f64, now: Instant) -> RecordOutcome {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.debounce.duration() {
                return RecordOutcome::Debounced;
            }
        }
        let outcome = self.record_direct(position, now);
        if outcome.is_accepted() {
            self.last_accepted = Some(now);
        }
        outcome
    }

    /// Records with the policy matching the modality.
    pub fn record(&mut self, position: f64, modality: SeekModality, now: Instant) -> RecordOutcome {
        match modality {
            SeekModality::Direct => self.record_direct(position, now),
            SeekModality::Indirect => self.record_debounced(position, now),
        }
    }

    /// Captures the load-time position. Set at most once per tracked
    /// video, and only when at least the minimum gap from zero.
    ///
    /// Returns true when the value was stored.
    pub fn capture_load_time(&mut self, position: f64) -> bool {
        if self.load_time_position.is_some() || position < self.min_gap.secs() {
            return false;
        }
        self.load_time_position = Some(position);
        true
    }

    #[must_use]
    pub fn load_time(&self) -> Option<f64> {
        self.load_time_position
    }

    #[must_use]
    pub fn has_load_time(&self) -> bool {
        self.load_time_position.is_some()
    }

    /// The list handed to the dialog: the synthetic load-time entry first
    /// (when set and at least the minimum gap), then the history
    /// most-recent-first. Pure, no mutation.
    #[must_use]
    pub fn positions(&self) -> Vec<RecalledPosition> {
        let mut out = Vec::with_capacity(self.history.len() + 1);
        if let Some(load_time) = self.load_time_position {
            if load_time >= self.min_gap.secs() {
                out.push(RecalledPosition {
                    time: load_time,
                    saved_at: None,
                    origin: PositionOrigin::LoadTime,
                });
            }
        }
        out.extend(self.history.iter_recent_first().map(|entry| RecalledPosition {
            time: entry.time,
            saved_at: Some(entry.saved_at),
            origin: PositionOrigin::SeekHistory,
        }));
        out
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clears history, load-time position and debounce state in one step.
    pub fn reset(&mut self) {
        self.history.clear();
        self.load_time_position = None;
        self.last_accepted = None;
    }
}
