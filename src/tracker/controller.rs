// SPDX-License-Identifier: MPL-2.0
//! The tracking controller.
//!
//! [`SeekTracker`] wires the readiness machine, the recorder, the identity
//! monitor and the stable-time tracker over the [`MediaSource`] and
//! [`Clock`] ports, and owns the timer queue plus the single per-element
//! tracking handle.
//!
//! The host drives it cooperatively:
//!
//! - [`poll`](SeekTracker::poll) on a bounded tick (due timers fire here)
//! - [`handle_event`](SeekTracker::handle_event) on media events
//! - [`record_before_seek`](SeekTracker::record_before_seek) around seeks
//! - [`positions`](SeekTracker::positions) from the dialog layer
//!
//! Everything mutates synchronously inside one call; there is no thread
//! and no lock. [`next_deadline`](SeekTracker::next_deadline) lets an
//! event-loop host sleep precisely instead of polling blindly.

use super::identity::{ContentIdentityMonitor, IdentityMode, IdentityVerdict};
use super::readiness::{is_video_loaded, FallbackOutcome, ReadinessTracker, TriggerOutcome};
use super::recorder::{PositionRecorder, RecalledPosition, RecordOutcome, SeekModality};
use super::stable_time::StableTimeTracker;
use super::timers::{TimerClass, TimerId, TimerQueue};
use super::TrackerParams;
use crate::application::port::{Clock, ElementId, MediaEvent, MediaSource};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Ephemeral per-element state. Its existence is the attachment marker:
/// while a handle exists for element E, a second setup against E is a
/// no-op and no second handle can attach.
#[derive(Debug)]
struct TrackingHandle {
    element: ElementId,
    readiness: ReadinessTracker,
    stable: StableTimeTracker,
    stable_commit_timer: Option<TimerId>,
}

/// The Position-History & Readiness-Tracking controller.
pub struct SeekTracker {
    source: Arc<dyn MediaSource>,
    clock: Arc<dyn Clock>,
    params: TrackerParams,
    timers: TimerQueue,
    recorder: PositionRecorder,
    identity: ContentIdentityMonitor,
    handle: Option<TrackingHandle>,
}

impl SeekTracker {
    /// Creates the tracker. The identity-monitor mode follows the source:
    /// identifier comparison when it supplies stable content ids, source
    /// tracking otherwise.
    #[must_use]
    pub fn new(source: Arc<dyn MediaSource>, clock: Arc<dyn Clock>, params: TrackerParams) -> Self {
        let mode = if source.has_content_identity() {
            IdentityMode::Identifier
        } else {
            IdentityMode::SourceTracking
        };
        Self {
            recorder: PositionRecorder::new(params.min_gap, params.capacity, params.debounce),
            identity: ContentIdentityMonitor::new(mode),
            timers: TimerQueue::new(),
            handle: None,
            source,
            clock,
            params,
        }
    }

    /// One bounded tick: fire due timers, re-check content identity
    /// (setting up or resetting as needed), then observe the playback
    /// position.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        self.fire_due_timers(now);
        self.check_identity(now);
        self.observe_time(now);
    }

    /// Feeds a readiness-indicating media event from the host.
    ///
    /// All events act as identical triggers while not yet ready; delivery
    /// also performs the identity check, so an event arriving before the
    /// first poll still sets tracking up.
    pub fn handle_event(&mut self, event: MediaEvent) {
        let now = self.clock.now();
        debug!(?event, "media event");
        self.check_identity(now);
        self.trigger_readiness(now);
    }

    /// Records a candidate position around a seek. The modality picks the
    /// policy: `Direct` for timeline seeks (never debounced), `Indirect`
    /// for keyboard/button seeks (debounced).
    ///
    /// Gated on readiness: while the element is not ready for tracking,
    /// nothing is recorded and [`RecordOutcome::NotReady`] is returned.
    pub fn record_before_seek(&mut self, time: f64, modality: SeekModality) -> RecordOutcome {
        if !self.is_ready() {
            return RecordOutcome::NotReady;
        }
        let now = self.clock.now();
        self.recorder.record(time, modality, now)
    }

    /// Explicit manual save requested by the user. Routes through the
    /// save primitive, preserving all distance invariants, without the
    /// readiness gate: the user action is its own evidence of readiness.
    pub fn save_user_position(&mut self, time: f64) -> RecordOutcome {
        let now = self.clock.now();
        self.recorder.record_direct(time, now)
    }

    /// The ordered recall list for the dialog: the load-time entry first,
    /// then remembered positions most-recent-first.
    #[must_use]
    pub fn positions(&self) -> Vec<RecalledPosition> {
        self.recorder.positions()
    }

    /// The settle-delayed "before seek" reading.
    ///
    /// Tries, in order: the stable value, the last polled value, the live
    /// instantaneous read, the native fallback.
    #[must_use]
    pub fn stable_time(&self) -> Option<f64> {
        match &self.handle {
            Some(handle) => stable_read(&handle.stable, self.source.as_ref()),
            None => self
                .source
                .current_time()
                .or_else(|| self.source.native_time()),
        }
    }

    /// True once the tracked element is ready for recording.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.readiness.is_ready())
    }

    /// The load-time position, if one was captured for this video.
    #[must_use]
    pub fn load_time_position(&self) -> Option<f64> {
        self.recorder.load_time()
    }

    /// Earliest pending timer deadline, for hosts that sleep between
    /// polls instead of ticking blindly.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// The bounded tick interval the tracker was configured with.
    #[must_use]
    pub fn poll_interval(&self) -> std::time::Duration {
        self.params.poll_interval
    }

    /// Cancels every timer, drops the tracking handle and forgets the
    /// element. The tracker is inert afterwards until new content shows
    /// up through `poll`.
    pub fn cleanup(&mut self) {
        self.teardown();
        self.timers.cancel_all();
        self.identity.clear();
        debug!("tracker cleaned up");
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn fire_due_timers(&mut self, now: Instant) {
        for firing in self.timers.take_due(now) {
            match firing.class {
                TimerClass::LoadCapture => self.on_capture_fired(firing.id, now),
                TimerClass::ReadySettle => self.on_settle_fired(firing.id),
                TimerClass::ReadyFallback => self.on_fallback_fired(firing.id),
                TimerClass::StableCommit => self.on_stable_commit_fired(firing.id, now),
            }
        }
    }

    fn on_capture_fired(&mut self, id: TimerId, now: Instant) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if !handle.readiness.capture_fired(id, now, &mut self.timers) {
            return;
        }
        let reading = stable_read(&handle.stable, self.source.as_ref());
        if let Some(time) = reading {
            if self.recorder.capture_load_time(time) {
                info!(time, "captured load-time position");
            }
        }
    }

    fn on_settle_fired(&mut self, id: TimerId) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.readiness.settle_fired(id) {
            debug!(element = %handle.element, "ready for seek recording");
        }
    }

    fn on_fallback_fired(&mut self, id: TimerId) {
        let loaded = is_video_loaded(self.source.duration());
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        match handle.readiness.fallback_fired(id, loaded) {
            FallbackOutcome::ForcedReady => {
                info!(element = %handle.element, "readiness forced by fallback timer");
            }
            FallbackOutcome::StillNotLoaded => {
                debug!(
                    element = %handle.element,
                    "element never reported a valid duration; still waiting"
                );
            }
            FallbackOutcome::Stale => {}
        }
    }

    fn on_stable_commit_fired(&mut self, id: TimerId, now: Instant) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.stable_commit_timer == Some(id) {
            handle.stable_commit_timer = None;
            handle.stable.commit_due(now);
        }
    }

    fn check_identity(&mut self, now: Instant) {
        let element = self.source.element();
        let content_id = self.source.content_id();
        let source_url = self.source.source_url();
        match self
            .identity
            .observe(element, content_id.as_deref(), source_url.as_deref())
        {
            IdentityVerdict::Untracked | IdentityVerdict::Unchanged => {}
            IdentityVerdict::FirstObservation => {
                if let Some(id) = element {
                    self.setup(id, now);
                }
            }
            IdentityVerdict::NewContent(reason) => {
                info!(%reason, "content changed, resetting position history");
                self.teardown();
                if let Some(id) = element {
                    self.setup(id, now);
                }
            }
        }
    }

    fn setup(&mut self, element: ElementId, now: Instant) {
        if self
            .handle
            .as_ref()
            .is_some_and(|handle| handle.element == element)
        {
            return;
        }
        if self.handle.is_some() {
            self.teardown();
        }
        let readiness = ReadinessTracker::new(
            now,
            self.params.capture_window,
            self.params.settle_delay,
            self.params.fallback_buffer,
            &mut self.timers,
        );
        self.handle = Some(TrackingHandle {
            element,
            readiness,
            stable: StableTimeTracker::new(self.params.settle_delay),
            stable_commit_timer: None,
        });
        debug!(%element, "tracking media element");
        // Immediate check: the element may already be loaded at setup.
        self.trigger_readiness(now);
        self.observe_time(now);
    }

    fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.readiness.cancel_all(&mut self.timers);
            if let Some(id) = handle.stable_commit_timer.take() {
                self.timers.cancel(id);
            }
        }
        self.recorder.reset();
    }

    fn trigger_readiness(&mut self, now: Instant) {
        let loaded = is_video_loaded(self.source.duration());
        let captured = self.recorder.has_load_time();
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        match handle
            .readiness
            .handle_trigger(loaded, captured, now, &mut self.timers)
        {
            TriggerOutcome::ScheduledCapture => {
                debug!(element = %handle.element, "load-time capture scheduled");
            }
            TriggerOutcome::BecameReady => {
                debug!(element = %handle.element, "ready for seek recording");
            }
            TriggerOutcome::Ignored => {}
        }
    }

    fn observe_time(&mut self, now: Instant) {
        let reading = self
            .source
            .current_time()
            .or_else(|| self.source.native_time());
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        let Some(time) = reading else {
            return;
        };
        if handle.stable.observe(time, now) {
            if let Some(old) = handle.stable_commit_timer.take() {
                self.timers.cancel(old);
            }
            handle.stable_commit_timer = Some(
                self.timers
                    .schedule(TimerClass::StableCommit, now + self.params.settle_delay),
            );
        }
    }
}

impl std::fmt::Debug for SeekTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeekTracker")
            .field("params", &self.params)
            .field("handle", &self.handle)
            .field("history_len", &self.recorder.history_len())
            .finish_non_exhaustive()
    }
}

/// The ordered "before seek" accessor chain: stable value, last polled
/// value, live instantaneous read, native fallback.
fn stable_read(stable: &StableTimeTracker, source: &dyn MediaSource) -> Option<f64> {
    let accessors: [&dyn Fn() -> Option<f64>; 4] = [
        &|| stable.stable(),
        &|| stable.last_observed(),
        &|| source.current_time(),
        &|| source.native_time(),
    ];
    accessors.iter().find_map(|read| read())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::VirtualClock;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct FakeState {
        element: Option<ElementId>,
        current_time: Option<f64>,
        native_time: Option<f64>,
        duration: Option<f64>,
        source_url: Option<String>,
        content_id: Option<String>,
        has_identity: bool,
    }

    #[derive(Debug, Default)]
    struct FakeSource {
        state: Mutex<FakeState>,
    }

    impl FakeSource {
        fn with(state: FakeState) -> Arc<Self> {
            Arc::new(Self {
                state: Mutex::new(state),
            })
        }

        fn set_time(&self, time: Option<f64>) {
            let mut state = self.state.lock().unwrap();
            state.current_time = time;
            state.native_time = time;
        }

        fn set_element(&self, element: Option<ElementId>) {
            self.state.lock().unwrap().element = element;
        }

        fn set_duration(&self, duration: Option<f64>) {
            self.state.lock().unwrap().duration = duration;
        }

        fn set_source_url(&self, url: Option<&str>) {
            self.state.lock().unwrap().source_url = url.map(str::to_string);
        }
    }

    impl MediaSource for FakeSource {
        fn element(&self) -> Option<ElementId> {
            self.state.lock().unwrap().element
        }

        fn current_time(&self) -> Option<f64> {
            self.state.lock().unwrap().current_time
        }

        fn native_time(&self) -> Option<f64> {
            self.state.lock().unwrap().native_time
        }

        fn duration(&self) -> Option<f64> {
            self.state.lock().unwrap().duration
        }

        fn source_url(&self) -> Option<String> {
            self.state.lock().unwrap().source_url.clone()
        }

        fn content_id(&self) -> Option<String> {
            self.state.lock().unwrap().content_id.clone()
        }

        fn has_content_identity(&self) -> bool {
            self.state.lock().unwrap().has_identity
        }
    }

    fn params() -> TrackerParams {
        TrackerParams::default()
    }

    fn loaded_source() -> Arc<FakeSource> {
        FakeSource::with(FakeState {
            element: Some(ElementId(1)),
            current_time: Some(115.0),
            native_time: Some(115.0),
            duration: Some(7200.0),
            source_url: Some("blob:a".to_string()),
            ..FakeState::default()
        })
    }

    /// Advances the clock in `step` increments, polling at each tick.
    fn run_for(tracker: &mut SeekTracker, clock: &VirtualClock, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            clock.advance(step);
            elapsed += step;
            tracker.poll();
        }
    }

    #[test]
    fn poll_sets_up_tracking_and_reaches_ready() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        tracker.poll();
        assert!(!tracker.is_ready());

        // Capture window (1000ms) + settle (500ms), polled at 100ms steps.
        run_for(&mut tracker, &clock, Duration::from_millis(1600), Duration::from_millis(100));

        assert!(tracker.is_ready());
        assert_eq!(tracker.load_time_position(), Some(115.0));
    }

    #[test]
    fn recording_is_gated_until_ready() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source, Arc::new(clock.clone()), params());

        tracker.poll();
        assert_eq!(
            tracker.record_before_seek(300.0, SeekModality::Direct),
            RecordOutcome::NotReady
        );
        assert!(tracker.positions().is_empty());
    }

    #[test]
    fn event_before_first_poll_sets_tracking_up() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source, Arc::new(clock.clone()), params());

        tracker.handle_event(MediaEvent::LoadedMetadata);

        // The fallback timer exists, so setup happened.
        assert!(tracker.next_deadline().is_some());
    }

    #[test]
    fn not_loaded_element_stays_not_ready_until_fallback_cannot_help() {
        let source = loaded_source();
        source.set_duration(Some(0.0));
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        // Run well past the fallback deadline (3500ms).
        run_for(&mut tracker, &clock, Duration::from_secs(5), Duration::from_millis(250));
        assert!(!tracker.is_ready());

        // Once the duration appears, a trigger succeeds; past the capture
        // window it goes straight to ready.
        source.set_duration(Some(7200.0));
        tracker.handle_event(MediaEvent::DurationChanged);
        assert!(tracker.is_ready());
        assert_eq!(tracker.load_time_position(), None);
    }

    #[test]
    fn fallback_forces_ready_when_triggers_never_fire() {
        // Element loaded, but the host never forwards a media event and
        // the duration only appears after setup.
        let source = loaded_source();
        source.set_duration(None);
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        tracker.poll();
        source.set_duration(Some(7200.0));

        // No events arrive; only polls. The fallback fires at 3500ms.
        run_for(&mut tracker, &clock, Duration::from_secs(4), Duration::from_millis(500));

        assert!(tracker.is_ready());
        // Fallback path never captures a load time.
        assert_eq!(tracker.load_time_position(), None);
    }

    #[test]
    fn source_change_resets_history_and_readiness() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        tracker.poll();
        run_for(&mut tracker, &clock, Duration::from_millis(1600), Duration::from_millis(100));
        assert!(tracker.is_ready());
        assert_eq!(
            tracker.record_before_seek(300.0, SeekModality::Direct),
            RecordOutcome::Accepted
        );

        source.set_source_url(Some("blob:b"));
        tracker.poll();

        assert!(tracker.positions().is_empty());
        assert_eq!(tracker.load_time_position(), None);
        assert!(!tracker.is_ready());
    }

    #[test]
    fn element_change_resets_history() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        tracker.poll();
        run_for(&mut tracker, &clock, Duration::from_millis(1600), Duration::from_millis(100));
        tracker.record_before_seek(300.0, SeekModality::Direct);
        assert_eq!(tracker.positions().len(), 2);

        source.set_element(Some(ElementId(2)));
        tracker.poll();

        assert!(tracker.positions().is_empty());
    }

    #[test]
    fn repeated_polls_do_not_restart_tracking() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source, Arc::new(clock.clone()), params());

        tracker.poll();
        run_for(&mut tracker, &clock, Duration::from_millis(1600), Duration::from_millis(100));
        assert!(tracker.is_ready());

        // Many more polls on the same element: readiness is terminal.
        run_for(&mut tracker, &clock, Duration::from_secs(10), Duration::from_millis(500));
        assert!(tracker.is_ready());
        assert_eq!(tracker.load_time_position(), Some(115.0));
    }

    #[test]
    fn stable_time_prefers_committed_over_live() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source.clone(), Arc::new(clock.clone()), params());

        tracker.poll();
        // Let the stable value commit at 115.
        run_for(&mut tracker, &clock, Duration::from_millis(600), Duration::from_millis(100));
        assert_eq!(tracker.stable_time(), Some(115.0));

        // The site updates the scrub position before the seek completes.
        source.set_time(Some(900.0));
        assert_eq!(tracker.stable_time(), Some(115.0));
    }

    #[test]
    fn stable_time_without_handle_falls_back_to_live_read() {
        let source = loaded_source();
        source.set_element(None);
        let clock = VirtualClock::new();
        let tracker = SeekTracker::new(source, Arc::new(clock), params());

        assert_eq!(tracker.stable_time(), Some(115.0));
    }

    #[test]
    fn save_user_position_bypasses_the_readiness_gate() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source, Arc::new(clock), params());

        tracker.poll();
        assert!(!tracker.is_ready());
        assert_eq!(tracker.save_user_position(300.0), RecordOutcome::Accepted);
        assert_eq!(tracker.positions().len(), 1);
    }

    #[test]
    fn cleanup_cancels_everything_and_later_polls_are_inert() {
        let source = loaded_source();
        let clock = VirtualClock::new();
        let mut tracker = SeekTracker::new(source, Arc::new(clock.clone()), params());

        tracker.poll();
        assert!(tracker.next_deadline().is_some());

        tracker.cleanup();
        assert!(tracker.next_deadline().is_none());

        // The element is still there, so a later poll may re-track it,
        // but nothing fires from the old life.
        clock.advance(Duration::from_secs(10));
        tracker.poll();
        assert!(!tracker.is_ready());
    }
}
