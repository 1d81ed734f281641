// SPDX-License-Identifier: MPL-2.0
//! Content identity monitoring.
//!
//! Decides when the tracked element represents genuinely different content
//! so the position history can be discarded, while tolerating the noise of
//! adaptive streaming, where transient buffer-relative source strings
//! rotate for the same content.
//!
//! Two mutually exclusive modes, selected at construction by whether the
//! source supplies stable content identifiers:
//!
//! - **Identifier mode**: new content iff a previously observed non-null
//!   identifier differs from a current non-null one. Null readings on
//!   either side never match as a change.
//! - **Source-tracking mode** (default): the same comparison on the
//!   element's reported source string.
//!
//! Independently of mode, a change of the element reference is always new
//! content. The first observation is never a change.

use crate::application::port::ElementId;
use std::fmt;

/// Comparison mode, fixed for the monitor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// Compare host-supplied stable content identifiers.
    Identifier,
    /// Compare the element's reported source string.
    SourceTracking,
}

/// Why a reset was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewContentReason {
    ElementChanged,
    IdentifierChanged,
    SourceChanged,
}

impl fmt::Display for NewContentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewContentReason::ElementChanged => write!(f, "element changed"),
            NewContentReason::IdentifierChanged => write!(f, "content identifier changed"),
            NewContentReason::SourceChanged => write!(f, "source changed"),
        }
    }
}

/// Result of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityVerdict {
    /// No element to observe; baselines are left in place.
    Untracked,
    /// First element ever observed; tracking starts, never a change.
    FirstObservation,
    /// Same content as before.
    Unchanged,
    /// Genuinely new content; the caller must reset.
    NewContent(NewContentReason),
}

/// Watches element identity plus one content signal per mode.
#[derive(Debug)]
pub struct ContentIdentityMonitor {
    mode: IdentityMode,
    tracked_element: Option<ElementId>,
    baseline_id: Option<String>,
    baseline_source: Option<String>,
}

impl ContentIdentityMonitor {
    #[must_use]
    pub fn new(mode: IdentityMode) -> Self {
        Self {
            mode,
            tracked_element: None,
            baseline_id: None,
            baseline_source: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    #[must_use]
    pub fn tracked_element(&self) -> Option<ElementId> {
        self.tracked_element
    }

    /// Feeds one reading of the source. Runs on every poll tick and on
    /// each explicit setup.
    ///
    /// On `NewContent` the monitor has already re-baselined to the current
    /// readings; the caller tears down and re-creates its handle.
    pub fn observe(
        &mut self,
        element: Option<ElementId>,
        content_id: Option<&str>,
        source_url: Option<&str>,
    ) -> IdentityVerdict {
        let Some(current) = element else {
            return IdentityVerdict::Untracked;
        };
        match self.tracked_element {
            None => {
                self.tracked_element = Some(current);
                self.rebaseline(content_id, source_url);
                IdentityVerdict::FirstObservation
            }
            Some(previous) if previous != current => {
                self.tracked_element = Some(current);
                self.rebaseline(content_id, source_url);
                IdentityVerdict::NewContent(NewContentReason::ElementChanged)
            }
            Some(_) => match self.mode {
                IdentityMode::Identifier => self.compare_identifier(content_id, source_url),
                IdentityMode::SourceTracking => self.compare_source(content_id, source_url),
            },
        }
    }

    /// Forgets everything; the next observation is a first observation.
    pub fn clear(&mut self) {
        self.tracked_element = None;
        self.baseline_id = None;
        self.baseline_source = None;
    }

    fn compare_identifier(
        &mut self,
        content_id: Option<&str>,
        source_url: Option<&str>,
    ) -> IdentityVerdict {
        match (self.baseline_id.as_deref(), content_id) {
            (Some(baseline), Some(current)) if baseline != current => {
                self.rebaseline(content_id, source_url);
                IdentityVerdict::NewContent(NewContentReason::IdentifierChanged)
            }
            (None, Some(current)) => {
                // null -> value is never itself a change.
                self.baseline_id = Some(current.to_string());
                IdentityVerdict::Unchanged
            }
            _ => IdentityVerdict::Unchanged,
        }
    }

    fn compare_source(
        &mut self,
        content_id: Option<&str>,
        source_url: Option<&str>,
    ) -> IdentityVerdict {
        match (self.baseline_source.as_deref(), source_url) {
            (Some(baseline), Some(current)) if baseline != current => {
                self.rebaseline(content_id, source_url);
                IdentityVerdict::NewContent(NewContentReason::SourceChanged)
            }
            (None, Some(current)) => {
                // unset -> set is never itself a change.
                self.baseline_source = Some(current.to_string());
                IdentityVerdict::Unchanged
            }
            _ => IdentityVerdict::Unchanged,
        }
    }

    fn rebaseline(&mut self, content_id: Option<&str>, source_url: Option<&str>) {
        self.baseline_id = content_id.map(str::to_string);
        self.baseline_source = source_url.map(str::to_string);
    }
}
