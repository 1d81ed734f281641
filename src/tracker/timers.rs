// SPDX-License-Identifier: MPL-2.0
//! Cooperative timer queue for the tracking engine.
//!
//! The engine is single-threaded: timers do not fire on their own, the
//! host drives [`SeekTracker::poll`](crate::tracker::SeekTracker::poll)
//! and due timers fire inside that call. Every scheduled timer is
//! individually cancellable, and cancellation is recorded as a flag that
//! is consulted when the timer comes due, so a timer that was superseded
//! can never act against newer state.

use std::time::Instant;

/// The named classes of timer the engine schedules.
///
/// A reset cancels all four classes before any new setup begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerClass {
    /// Read the stable time and capture the load-time position.
    LoadCapture,
    /// Transition from captured to ready after the settle delay.
    ReadySettle,
    /// Force readiness if the normal triggers never fired.
    ReadyFallback,
    /// Commit a pending stable-time value.
    StableCommit,
}

/// Identity of a scheduled timer. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A timer that came due and was not cancelled.
#[derive(Debug, Clone, Copy)]
pub struct Firing {
    pub id: TimerId,
    pub class: TimerClass,
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    class: TimerClass,
    deadline: Instant,
    cancelled: bool,
}

/// Queue of pending timers, owned by the controller.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer of the given class at `deadline` and returns its
    /// id.
    pub fn schedule(&mut self, class: TimerClass, deadline: Instant) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            class,
            deadline,
            cancelled: false,
        });
        id
    }

    /// Cancels a single timer. A cancelled timer never fires, even when
    /// already due.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.cancelled = true;
        }
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&mut self) {
        for entry in &mut self.entries {
            entry.cancelled = true;
        }
    }

    /// Returns true when the timer is scheduled and not cancelled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && !e.cancelled)
    }

    /// Number of pending (non-cancelled) timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.cancelled).count()
    }

    /// Earliest deadline among pending timers, for hosts that want to
    /// sleep precisely between polls.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|e| !e.cancelled)
            .map(|e| e.deadline)
            .min()
    }

    /// Removes and returns every timer due at `now`, ordered by deadline.
    ///
    /// Cancelled entries that are due are dropped silently; they never
    /// appear in the result.
    pub fn take_due(&mut self, now: Instant) -> Vec<Firing> {
        let mut due: Vec<Entry> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.0.cmp(&b.id.0)));
        due.into_iter()
            .filter(|e| !e.cancelled)
            .map(|e| Firing {
                id: e.id,
                class: e.class,
            })
            .collect()
    }
}
