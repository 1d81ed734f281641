// SPDX-License-Identifier: MPL-2.0
//! Readiness state machine for the tracked media element.
//!
//! Gates when seeks may be recorded, and opportunistically captures the
//! load-time position within a short window after setup. Transitions are
//! monotonic per tracked element:
//!
//! - `NotReady`: waiting for the element to report a valid duration
//! - `CaptureScheduled`: loaded inside the capture window; a load-time
//!   capture is pending
//! - `SettleScheduled`: capture done; ready after the settle delay
//! - `Ready`: recording allowed, terminal until reset
//!
//! Any number of triggers may arrive in any order (host media events, the
//! immediate check at setup, seek completions); `handle_trigger` is
//! idempotent and at most one capture/settle sequence is ever in flight.
//! A fallback timer armed at setup forces readiness if the normal triggers
//! never complete while the element is in fact loaded.

use super::timers::{TimerClass, TimerId, TimerQueue};
use std::time::{Duration, Instant};

/// Returns true when the reported duration means "loaded".
///
/// Strictly positive values qualify, including `f64::INFINITY` (live
/// streams). `0`, negative values, `NaN` and an absent reading do not.
#[must_use]
pub fn is_video_loaded(duration: Option<f64>) -> bool {
    matches!(duration, Some(d) if d > 0.0)
}

/// Phase of the readiness state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPhase {
    /// Element not yet loaded; waiting for a trigger that finds it loaded.
    NotReady,
    /// Load-time capture timer armed.
    CaptureScheduled,
    /// Capture done; ready-transition timer armed.
    SettleScheduled,
    /// Recording allowed. Terminal until reset.
    Ready,
}

/// Result of feeding a readiness trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Nothing changed (already ready, sequence in flight, or not loaded).
    Ignored,
    /// A load-time capture was scheduled at the end of the capture window.
    ScheduledCapture,
    /// The tracker went straight to ready (trigger landed past the window).
    BecameReady,
}

/// Result of the fallback timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// The firing was stale or the machine had already progressed.
    Stale,
    /// Still not ready but loaded: readiness was forced, without capture.
    ForcedReady,
    /// Still not loaded. The machine stays `NotReady` and waits for a
    /// later trigger. Accepted liveness risk, not an error.
    StillNotLoaded,
}

/// Per-element readiness tracker.
#[derive(Debug)]
pub struct ReadinessTracker {
    phase: ReadinessPhase,
    setup_at: Instant,
    capture_window: Duration,
    settle_delay: Duration,
    capture_timer: Option<TimerId>,
    settle_timer: Option<TimerId>,
    fallback_timer: Option<TimerId>,
}

impl ReadinessTracker {
    /// Creates the tracker and arms the fallback timer at
    /// `capture_window + settle_delay + fallback_buffer`.
    pub fn new(
        now: Instant,
        capture_window: Duration,
        settle_delay: Duration,
        fallback_buffer: Duration,
        timers: &mut TimerQueue,
    ) -> Self {
        let fallback_deadline = now + capture_window + settle_delay + fallback_buffer;
        let fallback_timer = Some(timers.schedule(TimerClass::ReadyFallback, fallback_deadline));
        Self {
            phase: ReadinessPhase::NotReady,
            setup_at: now,
            capture_window,
            settle_delay,
            capture_timer: None,
            settle_timer: None,
            fallback_timer,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ReadinessPhase {
        self.phase
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == ReadinessPhase::Ready
    }

    /// Feeds one readiness trigger. Idempotent, callable from any signal.
    ///
    /// `loaded` is the current [`is_video_loaded`] reading and
    /// `load_time_captured` whether a load-time position already exists
    /// for this video.
    pub fn handle_trigger(
        &mut self,
        loaded: bool,
        load_time_captured: bool,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> TriggerOutcome {
        match self.phase {
            ReadinessPhase::Ready => {
                self.cancel_fallback(timers);
                TriggerOutcome::Ignored
            }
            ReadinessPhase::CaptureScheduled | ReadinessPhase::SettleScheduled => {
                TriggerOutcome::Ignored
            }
            ReadinessPhase::NotReady => {
                if !loaded {
                    return TriggerOutcome::Ignored;
                }
                self.cancel_fallback(timers);
                let elapsed = now.saturating_duration_since(self.setup_at);
                if elapsed <= self.capture_window && !load_time_captured {
                    let deadline = self.setup_at + self.capture_window;
                    self.capture_timer = Some(timers.schedule(TimerClass::LoadCapture, deadline));
                    self.phase = ReadinessPhase::CaptureScheduled;
                    TriggerOutcome::ScheduledCapture
                } else {
                    self.phase = ReadinessPhase::Ready;
                    TriggerOutcome::BecameReady
                }
            }
        }
    }

    /// Handles the capture timer firing. Returns true when the firing is
    /// current, in which case the caller performs the stable-time read and
    /// the ready transition has been scheduled after the settle delay.
    pub fn capture_fired(&mut self, id: TimerId, now: Instant, timers: &mut TimerQueue) -> bool {
        if self.phase != ReadinessPhase::CaptureScheduled || self.capture_timer != Some(id) {
            return false;
        }
        self.capture_timer = None;
        self.settle_timer =
            Some(timers.schedule(TimerClass::ReadySettle, now + self.settle_delay));
        self.phase = ReadinessPhase::SettleScheduled;
        true
    }

    /// Handles the settle timer firing. Returns true when the machine
    /// transitioned to `Ready`.
    pub fn settle_fired(&mut self, id: TimerId) -> bool {
        if self.phase != ReadinessPhase::SettleScheduled || self.settle_timer != Some(id) {
            return false;
        }
        self.settle_timer = None;
        self.phase = ReadinessPhase::Ready;
        true
    }

    /// Handles the fallback timer firing.
    pub fn fallback_fired(&mut self, id: TimerId, loaded: bool) -> FallbackOutcome {
        if self.fallback_timer != Some(id) {
            return FallbackOutcome::Stale;
        }
        self.fallback_timer = None;
        if self.phase != ReadinessPhase::NotReady {
            return FallbackOutcome::Stale;
        }
        if loaded {
            self.phase = ReadinessPhase::Ready;
            FallbackOutcome::ForcedReady
        } else {
            FallbackOutcome::StillNotLoaded
        }
    }

    /// Cancels every timer this tracker owns. Used on reset and teardown.
    pub fn cancel_all(&mut self, timers: &mut TimerQueue) {
        for id in [
            self.capture_timer.take(),
            self.settle_timer.take(),
            self.fallback_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            timers.cancel(id);
        }
    }

    fn cancel_fallback(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.fallback_timer.take() {
            timers.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE_WINDOW: Duration = Duration::from_millis(1000);
    const SETTLE: Duration = Duration::from_millis(500);
    const BUFFER: Duration = Duration::from_millis(2000);

    fn tracker(now: Instant) -> (ReadinessTracker, TimerQueue) {
        let mut timers = TimerQueue::new();
        let tracker = ReadinessTracker::new(now, CAPTURE_WINDOW, SETTLE, BUFFER, &mut timers);
        (tracker, timers)
    }

    #[test]
    fn loaded_accepts_positive_finite_and_infinite_durations() {
        assert!(is_video_loaded(Some(0.001)));
        assert!(is_video_loaded(Some(3600.0)));
        assert!(is_video_loaded(Some(f64::INFINITY)));
    }

    #[test]
    fn loaded_rejects_zero_nan_negative_and_absent() {
        assert!(!is_video_loaded(Some(0.0)));
        assert!(!is_video_loaded(Some(f64::NAN)));
        assert!(!is_video_loaded(Some(-1.0)));
        assert!(!is_video_loaded(None));
    }

    #[test]
    fn setup_arms_the_fallback_timer() {
        let now = Instant::now();
        let (_tracker, timers) = tracker(now);

        assert_eq!(timers.pending(), 1);
        assert_eq!(
            timers.next_deadline(),
            Some(now + CAPTURE_WINDOW + SETTLE + BUFFER)
        );
    }

    #[test]
    fn trigger_while_not_loaded_changes_nothing() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let outcome = tracker.handle_trigger(false, false, now, &mut timers);

        assert_eq!(outcome, TriggerOutcome::Ignored);
        assert_eq!(tracker.phase(), ReadinessPhase::NotReady);
        // The fallback stays armed for a later trigger.
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn trigger_inside_window_schedules_capture_at_window_end() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let trigger_at = now + Duration::from_millis(400);
        let outcome = tracker.handle_trigger(true, false, trigger_at, &mut timers);

        assert_eq!(outcome, TriggerOutcome::ScheduledCapture);
        assert_eq!(tracker.phase(), ReadinessPhase::CaptureScheduled);
        // Fallback cancelled, capture armed for the remainder of the window.
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.next_deadline(), Some(now + CAPTURE_WINDOW));
    }

    #[test]
    fn trigger_past_window_goes_straight_to_ready() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let trigger_at = now + Duration::from_millis(1500);
        let outcome = tracker.handle_trigger(true, false, trigger_at, &mut timers);

        assert_eq!(outcome, TriggerOutcome::BecameReady);
        assert!(tracker.is_ready());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn trigger_with_load_time_already_captured_skips_capture() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let outcome = tracker.handle_trigger(true, true, now, &mut timers);

        assert_eq!(outcome, TriggerOutcome::BecameReady);
        assert!(tracker.is_ready());
    }

    #[test]
    fn repeated_triggers_never_schedule_a_second_sequence() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        tracker.handle_trigger(true, false, now, &mut timers);
        let before = timers.pending();
        let outcome = tracker.handle_trigger(true, false, now + Duration::from_millis(100), &mut timers);

        assert_eq!(outcome, TriggerOutcome::Ignored);
        assert_eq!(timers.pending(), before);
    }

    #[test]
    fn capture_then_settle_reaches_ready() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);
        tracker.handle_trigger(true, false, now, &mut timers);

        let capture_at = now + CAPTURE_WINDOW;
        let firing = timers.take_due(capture_at);
        assert_eq!(firing.len(), 1);
        assert!(tracker.capture_fired(firing[0].id, capture_at, &mut timers));
        assert_eq!(tracker.phase(), ReadinessPhase::SettleScheduled);

        let settle_at = capture_at + SETTLE;
        let firing = timers.take_due(settle_at);
        assert_eq!(firing.len(), 1);
        assert!(tracker.settle_fired(firing[0].id));
        assert!(tracker.is_ready());
    }

    #[test]
    fn stale_capture_fire_is_rejected() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);
        tracker.handle_trigger(true, false, now, &mut timers);

        let stale = timers.schedule(TimerClass::LoadCapture, now);
        assert!(!tracker.capture_fired(stale, now, &mut timers));
        assert_eq!(tracker.phase(), ReadinessPhase::CaptureScheduled);
    }

    #[test]
    fn fallback_forces_ready_when_loaded() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let fire_at = now + CAPTURE_WINDOW + SETTLE + BUFFER;
        let firing = timers.take_due(fire_at);
        assert_eq!(firing.len(), 1);

        let outcome = tracker.fallback_fired(firing[0].id, true);

        assert_eq!(outcome, FallbackOutcome::ForcedReady);
        assert!(tracker.is_ready());
    }

    #[test]
    fn fallback_while_not_loaded_is_a_no_op() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);

        let fire_at = now + CAPTURE_WINDOW + SETTLE + BUFFER;
        let firing = timers.take_due(fire_at);
        let outcome = tracker.fallback_fired(firing[0].id, false);

        assert_eq!(outcome, FallbackOutcome::StillNotLoaded);
        assert_eq!(tracker.phase(), ReadinessPhase::NotReady);

        // A later trigger still succeeds.
        let later = fire_at + Duration::from_secs(5);
        let outcome = tracker.handle_trigger(true, false, later, &mut timers);
        assert_eq!(outcome, TriggerOutcome::BecameReady);
    }

    #[test]
    fn trigger_when_ready_cancels_a_lingering_fallback() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);
        // Force ready through the fallback path without consuming the queue
        // entry, then confirm a trigger cleans up.
        tracker.phase = ReadinessPhase::Ready;

        tracker.handle_trigger(true, false, now, &mut timers);

        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn cancel_all_clears_every_owned_timer() {
        let now = Instant::now();
        let (mut tracker, mut timers) = tracker(now);
        tracker.handle_trigger(true, false, now, &mut timers);

        tracker.cancel_all(&mut timers);

        assert_eq!(timers.pending(), 0);
    }
}
