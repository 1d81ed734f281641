// SPDX-License-Identifier: MPL-2.0
//! Settle-delayed stable playback time.
//!
//! Some sites visually update the scrub position before the element's own
//! seek completes, so the instantaneous reading is briefly inconsistent
//! around the seek moment. The tracker keeps a delayed "stable" value:
//! every observed position change re-arms a pending commit, and the commit
//! lands only once the settle delay has passed, so the stable value still
//! holds the pre-seek position while the jump is in flight.
//!
//! Consumers needing a "before seek" value must read through the ordered
//! accessor chain (stable, then last-known polled, then live, then
//! native), never the instantaneous reading alone.

use crate::config::defaults::POSITION_EPSILON_SECS;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct PendingCommit {
    value: f64,
    deadline: Instant,
}

/// Tracks a settle-delayed stable time alongside the last raw observation.
#[derive(Debug)]
pub struct StableTimeTracker {
    settle_delay: Duration,
    stable: Option<f64>,
    last_observed: Option<f64>,
    pending: Option<PendingCommit>,
}

impl StableTimeTracker {
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            stable: None,
            last_observed: None,
            pending: None,
        }
    }

    /// Feeds one polled reading into the tracker.
    ///
    /// Returns true when the reading differed from the previous one and a
    /// new pending commit was armed; the caller is expected to (re)schedule
    /// the stable-commit timer at [`pending_deadline`](Self::pending_deadline).
    pub fn observe(&mut self, time: f64, now: Instant) -> bool {
        let changed = self
            .last_observed
            .is_none_or(|last| (last - time).abs() > POSITION_EPSILON_SECS);
        self.last_observed = Some(time);
        if changed {
            self.pending = Some(PendingCommit {
                value: time,
                deadline: now + self.settle_delay,
            });
        }
        changed
    }

    /// Commits the pending value if its settle deadline has passed.
    ///
    /// Called when the stable-commit timer fires. Returns the committed
    /// value, or `None` when nothing was due (a stale fire after re-arm).
    pub fn commit_due(&mut self, now: Instant) -> Option<f64> {
        let pending = self.pending?;
        if pending.deadline > now {
            return None;
        }
        self.pending = None;
        self.stable = Some(pending.value);
        Some(pending.value)
    }

    /// The committed stable value, if any.
    #[must_use]
    pub fn stable(&self) -> Option<f64> {
        self.stable
    }

    /// The last raw observation, committed or not.
    #[must_use]
    pub fn last_observed(&self) -> Option<f64> {
        self.last_observed
    }

    /// Deadline of the pending commit, if one is armed.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }
}
